//! Derivation of virtual object names that fit the kubernetes name length limit.
//!
//! Names longer than [`MAX_NAME_LENGTH`] are cut to [`TRUNCATED_PREFIX_LENGTH`]
//! bytes and suffixed with the first [`HASH_SUFFIX_LENGTH`] hex digits of a
//! sha256 digest, so two long names sharing a prefix still differ.

use sha2::{Digest, Sha256};
use tracing::trace;

use vcluster_types::defaults::{
    HASH_SUFFIX_LENGTH, MAX_NAME_LENGTH, NAME_SEPARATOR, TRUNCATED_PREFIX_LENGTH,
};

const JOIN: &str = "-";

/// Combine a name and namespace as `<name>-x-<namespace>`.
///
/// The plain form is only used when it splits back into exactly one
/// (name, namespace) pair, that is when the `-x-` token occurs once, and when
/// it does not end like a hashed name (`-` and hex digits). Any other input
/// gets the hashed form, with the digest taken over the unjoined parts so
/// distinct pairs never share a digest input.
pub fn concat_name_namespace(name: &str, namespace: &str) -> String {
    let full_path = [name, NAME_SEPARATOR, namespace].join(JOIN);
    if full_path.len() <= MAX_NAME_LENGTH
        && separator_count(&full_path) == 1
        && !has_hash_suffix(&full_path)
    {
        return full_path;
    }

    trace!(name, namespace, "hashing ambiguous or long name");
    let mut digest_input = Vec::with_capacity(name.len() + namespace.len() + 1);
    digest_input.extend_from_slice(name.as_bytes());
    // NUL is not allowed in object names
    digest_input.push(0);
    digest_input.extend_from_slice(namespace.as_bytes());
    hashed_name(&full_path, &digest_input)
}

/// occurrences of `-x-`, overlapping ones included
fn separator_count(full_path: &str) -> usize {
    let token = format!("{JOIN}{NAME_SEPARATOR}{JOIN}");
    full_path
        .as_bytes()
        .windows(token.len())
        .filter(|window| *window == token.as_bytes())
        .count()
}

/// ends with `-` followed by [`HASH_SUFFIX_LENGTH`] lowercase hex digits
fn has_hash_suffix(name: &str) -> bool {
    let bytes = name.as_bytes();
    let Some(start) = bytes.len().checked_sub(HASH_SUFFIX_LENGTH + 1) else {
        return false;
    };
    let (dash, digits) = bytes[start..].split_at(1);
    dash == JOIN.as_bytes()
        && digits
            .iter()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(b))
}

fn hashed_name(full_path: &str, digest_input: &[u8]) -> String {
    let digest = Sha256::digest(digest_input);
    let suffix = &hex::encode(digest)[..HASH_SUFFIX_LENGTH];

    let mut end = full_path.len().min(TRUNCATED_PREFIX_LENGTH);
    while !full_path.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}{JOIN}{suffix}", &full_path[..end]).replace(".-", "-")
}
