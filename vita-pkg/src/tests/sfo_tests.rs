use super::*;
use crate::fixtures::make_sfo;

const CONTENT_ID: &str = "UP0001-PCSE00001_00-MYGAME0000000000";

#[test]
fn decodes_title_and_content_id() {
    let raw = make_sfo(&[
        ("APP_VER", "01.00"),
        ("CONTENT_ID", CONTENT_ID),
        ("TITLE", "My Game"),
    ]);
    let sfo = Sfo::parse(&raw).unwrap();

    assert_eq!(sfo.title(), b"My Game");
    assert_eq!(sfo.content_id(), CONTENT_ID.as_bytes());
    assert_eq!(sfo.get(SfoKey::ContentId), CONTENT_ID.as_bytes());
}

#[test]
fn short_title_wins_in_either_order() {
    let before = make_sfo(&[
        ("STITLE", "Short"),
        ("TITLE", "Long Title"),
        ("CONTENT_ID", CONTENT_ID),
    ]);
    let after = make_sfo(&[
        ("TITLE", "Long Title"),
        ("CONTENT_ID", CONTENT_ID),
        ("STITLE", "Short"),
    ]);

    assert_eq!(Sfo::parse(&before).unwrap().title(), b"Short");
    assert_eq!(Sfo::parse(&after).unwrap().title(), b"Short");
}

#[test]
fn last_short_title_wins() {
    let raw = make_sfo(&[
        ("STITLE", "First"),
        ("CONTENT_ID", CONTENT_ID),
        ("STITLE", "Second"),
    ]);

    assert_eq!(Sfo::parse(&raw).unwrap().title(), b"Second");
}

#[test]
fn first_title_and_content_id_win() {
    let raw = make_sfo(&[
        ("TITLE", "First"),
        ("CONTENT_ID", "EP0001-PCSB00001_00-FIRST00000000000"),
        ("TITLE", "Second"),
        ("CONTENT_ID", "JP0001-PCSG00001_00-SECOND0000000000"),
    ]);
    let sfo = Sfo::parse(&raw).unwrap();

    assert_eq!(sfo.title(), b"First");
    assert_eq!(sfo.content_id(), b"EP0001-PCSB00001_00-FIRST00000000000");
}

#[test]
fn values_are_raw_bytes() {
    let raw = make_sfo(&[("TITLE", "Caf\u{e9}"), ("CONTENT_ID", CONTENT_ID)]);

    assert_eq!(Sfo::parse(&raw).unwrap().title(), "Caf\u{e9}".as_bytes());
}

#[test]
fn empty_index_is_rejected() {
    let raw = make_sfo(&[]);
    assert!(matches!(Sfo::parse(&raw), Err(ReadError::MissingField)));
}

#[test]
fn missing_fields_are_rejected() {
    let no_title = make_sfo(&[("CONTENT_ID", CONTENT_ID)]);
    let no_content_id = make_sfo(&[("TITLE", "My Game")]);

    assert!(matches!(Sfo::parse(&no_title), Err(ReadError::MissingField)));
    assert!(matches!(
        Sfo::parse(&no_content_id),
        Err(ReadError::MissingField)
    ));
}

#[test]
fn size_limits() {
    let mut raw = make_sfo(&[("TITLE", "My Game"), ("CONTENT_ID", CONTENT_ID)]);

    assert!(matches!(Sfo::parse(&raw[..15]), Err(ReadError::TooSmall)));
    assert!(matches!(Sfo::parse(&raw[..18]), Err(ReadError::TooSmall)));

    raw.resize(MAX_SIZE, 0);
    assert!(Sfo::parse(&raw).is_ok());

    raw.push(0);
    assert!(matches!(
        Sfo::parse(&raw),
        Err(ReadError::TooBig { size }) if size == MAX_SIZE + 1
    ));
}

#[test]
fn bad_magic_is_rejected() {
    let mut raw = make_sfo(&[("TITLE", "My Game"), ("CONTENT_ID", CONTENT_ID)]);
    raw[1..4].copy_from_slice(b"SFP");

    assert!(matches!(Sfo::parse(&raw), Err(ReadError::InvalidMagic)));
}

/// Build a blob whose key table starts at offset 0, so every key pointer of
/// zero names the empty string.
fn zeroed_sfo(size: usize, count: u32) -> Vec<u8> {
    let mut raw = vec![0u8; size];
    raw[0..4].copy_from_slice(b"\0PSF");
    raw[16..20].copy_from_slice(&count.to_le_bytes());
    raw
}

#[test]
fn index_past_the_end_is_rejected() {
    // Entries 0 and 1 fit, entry 2 needs bytes 52..54.
    let raw = zeroed_sfo(53, 3);

    assert!(matches!(
        Sfo::parse(&raw),
        Err(ReadError::IndexOutOfBounds { index: 2 })
    ));
    assert!(matches!(
        Sfo::parse(&zeroed_sfo(21, 1)),
        Err(ReadError::IndexOutOfBounds { index: 0 })
    ));
}

#[test]
fn index_check_covers_only_the_key_pointer() {
    // Two bytes are enough to get past the index check.
    assert!(matches!(
        Sfo::parse(&zeroed_sfo(22, 1)),
        Err(ReadError::MissingField)
    ));

    let mut raw = make_sfo(&[("TITLE", "My Game"), ("CONTENT_ID", CONTENT_ID)]);
    raw.truncate(22);
    assert!(matches!(
        Sfo::parse(&raw),
        Err(ReadError::KeyOutOfBounds { index: 0 })
    ));
}

#[test]
fn key_outside_blob_is_rejected() {
    let mut raw = make_sfo(&[("TITLE", "My Game"), ("CONTENT_ID", CONTENT_ID)]);
    raw[8..12].copy_from_slice(&0xFFFF_0000u32.to_le_bytes());

    assert!(matches!(
        Sfo::parse(&raw),
        Err(ReadError::KeyOutOfBounds { index: 0 })
    ));
}

#[test]
fn value_outside_blob_is_rejected() {
    let mut raw = make_sfo(&[("TITLE", "My Game"), ("CONTENT_ID", CONTENT_ID)]);
    // Value offset of the second entry.
    raw[20 + 16 + 12..20 + 16 + 16].copy_from_slice(&0x10_0000u32.to_le_bytes());

    assert!(matches!(
        Sfo::parse(&raw),
        Err(ReadError::ValueOutOfBounds { index: 1 })
    ));
}

#[test]
fn key_names_round_trip() {
    for key in [SfoKey::Title, SfoKey::ShortTitle, SfoKey::ContentId] {
        assert_eq!(SfoKey::from_bytes(key.as_str().as_bytes()), Some(key));
    }
    assert_eq!(SfoKey::from_bytes(b"title"), None);
    assert_eq!(SfoKey::from_bytes(b"TITLE_ID"), None);
}
