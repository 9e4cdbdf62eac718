//! Generated names: object storage keys and avatar seeds.

use rand::Rng;

use crate::types::DbId;

/// Prefix for uploaded item images in the bucket.
pub const IMAGE_KEY_PREFIX: &str = "uploads";

/// Extension and content type for item images.
pub const IMAGE_EXTENSION: &str = "jpeg";
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/9.x/lorelei-neutral/svg";

/// Build an image key from its parts: `uploads/<user>-<millis>-<suffix>.jpeg`.
pub fn image_key(user_id: DbId, unix_millis: i64, suffix: &str) -> String {
    format!("{IMAGE_KEY_PREFIX}/{user_id}-{unix_millis}-{suffix}.{IMAGE_EXTENSION}")
}

/// Generate a fresh image key for `user_id` using the current time and
/// 32 random bits.
pub fn generate_image_key(user_id: DbId) -> String {
    let suffix = format!("{:08x}", rand::rng().random::<u32>());
    image_key(user_id, chrono::Utc::now().timestamp_millis(), &suffix)
}

/// Reduce a display name to `[a-z0-9-]`, collapsing whitespace runs to `-`.
pub fn slugify_name(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.trim().chars() {
        if ch.is_whitespace() {
            pending_dash = !slug.is_empty();
        } else if ch.is_ascii_alphanumeric() || ch == '-' {
            if pending_dash {
                slug.push('-');
                pending_dash = false;
            }
            slug.push(ch.to_ascii_lowercase());
        }
    }
    slug
}

/// Generate an avatar seed: `<slug>-<6 random base36 chars>`.
pub fn generate_avatar_seed(name: &str) -> String {
    let mut rng = rand::rng();
    let tail: String = (0..6)
        .filter_map(|_| std::char::from_digit(rng.random_range(0..36), 36))
        .collect();
    let slug = slugify_name(name);
    if slug.is_empty() {
        tail
    } else {
        format!("{slug}-{tail}")
    }
}

/// Public avatar image URL for a seed. Seeds are URL-safe by construction.
pub fn avatar_url(seed: &str) -> String {
    format!("{AVATAR_BASE_URL}?seed={seed}&radius=50")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_key_layout() {
        assert_eq!(
            image_key(7, 1_700_000_000_000, "deadbeef"),
            "uploads/7-1700000000000-deadbeef.jpeg"
        );
    }

    #[test]
    fn generated_image_keys_differ() {
        let a = generate_image_key(3);
        let b = generate_image_key(3);
        assert!(a.starts_with("uploads/3-"));
        assert!(a.ends_with(".jpeg"));
        assert_ne!(a, b);
    }

    #[test]
    fn slugify_collapses_whitespace_and_drops_symbols() {
        assert_eq!(slugify_name("  Ada   Lovelace "), "ada-lovelace");
        assert_eq!(slugify_name("Zoë O'Neil"), "zo-oneil");
        assert_eq!(slugify_name("!!!"), "");
    }

    #[test]
    fn avatar_seed_has_random_tail() {
        let seed = generate_avatar_seed("Ada Lovelace");
        let (head, tail) = seed.rsplit_once('-').unwrap();
        assert_eq!(head, "ada-lovelace");
        assert_eq!(tail.len(), 6);
        assert!(tail.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
    }

    #[test]
    fn avatar_url_embeds_seed() {
        assert_eq!(
            avatar_url("ada-x1y2z3"),
            "https://api.dicebear.com/9.x/lorelei-neutral/svg?seed=ada-x1y2z3&radius=50"
        );
    }
}
