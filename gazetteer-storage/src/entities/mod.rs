//! Geographic reference entities
//!
//! One module per entity type. Every entity carries the surrogate `id`
//! primary key and the two server-assigned timestamps; natural identifiers
//! from the source data (`code`) are kept as unique columns instead of
//! primary keys.

pub mod city;
pub mod country;
pub mod currency;
pub mod district;
pub mod state;
pub mod street;
pub mod timezone;

pub use city::City;
pub use country::Country;
pub use currency::Currency;
pub use district::District;
pub use state::State;
pub use street::Street;
pub use timezone::Timezone;

/// Generate an ASCII slug from a display name.
///
/// Runs of punctuation and whitespace collapse into single dashes;
/// non-ASCII characters are dropped. Applied on create and refreshed
/// whenever `name` changes.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Lagos"), "lagos");
        assert_eq!(slugify("Port Harcourt"), "port-harcourt");
        assert_eq!(slugify("Saint-Denis (North)"), "saint-denis-north");
        assert_eq!(slugify("  Abu  Dhabi  "), "abu-dhabi");
    }
}
