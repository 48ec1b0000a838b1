use xxhash_rust::xxh3::Xxh3;

/// Stable 16-hex-char segment derived from an ordered set of byte parts.
///
/// Parts are separated by a zero byte so `["ab", "c"]` and `["a", "bc"]`
/// hash differently.
#[must_use]
pub fn hash_segment<I, P>(parts: I) -> String
where
    I: IntoIterator<Item = P>,
    P: AsRef<[u8]>,
{
    let mut hasher = Xxh3::new();
    for part in parts {
        hasher.update(part.as_ref());
        hasher.update(&[0]);
    }

    format!("{:016x}", hasher.digest())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_is_stable_and_fixed_width() {
        let a = hash_segment(["Query.searchPosts.req.vtl", "body"]);
        let b = hash_segment(["Query.searchPosts.req.vtl", "body"]);

        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn part_boundaries_matter() {
        assert_ne!(hash_segment(["ab", "c"]), hash_segment(["a", "bc"]));
    }
}
