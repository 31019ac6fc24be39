//! Turning raw titles into file name components.

/// Maximum number of characters produced by [`sanitize`].
pub const MAX_TITLE_LEN: usize = 255;

const RESERVED: &[u8] = b"<>\"/\\|?*";

/// Makes a raw title safe to use as part of a file name.
///
/// - Printable ASCII other than `< > " / \ | ? *` is kept.
/// - `:` becomes ` -`.
/// - A line feed becomes a space.
/// - Everything else is dropped.
///
/// The output never exceeds [`MAX_TITLE_LEN`] characters. Input ends at the
/// first NUL, if any.
#[must_use]
pub fn sanitize(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len().min(MAX_TITLE_LEN));
    let mut budget = MAX_TITLE_LEN;

    for &b in raw.iter().take_while(|&&b| b != 0) {
        if budget == 0 {
            break;
        }

        match b {
            b':' => {
                // Never split the replacement across the limit.
                if budget < 2 {
                    break;
                }
                out.push_str(" -");
                budget -= 2;
            }
            b'\n' => {
                out.push(' ');
                budget -= 1;
            }
            32..=126 if !RESERVED.contains(&b) => {
                out.push(char::from(b));
                budget -= 1;
            }
            _ => {}
        }
    }

    out
}
