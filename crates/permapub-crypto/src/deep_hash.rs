//! SHA-384 deep hash over nested byte lists.
//!
//! This is the message digest that data item signatures commit to. A blob is
//! hashed together with a `blob<len>` tag; a list folds the deep hashes of its
//! children into an accumulator seeded with a `list<len>` tag.

use sha2::{Digest, Sha384};

/// Input to [`deep_hash`].
#[derive(Clone, Debug)]
pub enum DeepHashChunk<'a> {
    Blob(&'a [u8]),
    List(Vec<DeepHashChunk<'a>>),
}

/// Compute the 48-byte deep hash of `chunk`.
pub fn deep_hash(chunk: &DeepHashChunk<'_>) -> [u8; 48] {
    match chunk {
        DeepHashChunk::Blob(data) => {
            let tag = sha384(format!("blob{}", data.len()).as_bytes());
            let body = sha384(data);
            let mut tagged = Vec::with_capacity(96);
            tagged.extend_from_slice(&tag);
            tagged.extend_from_slice(&body);
            sha384(&tagged)
        }
        DeepHashChunk::List(children) => {
            let mut acc = sha384(format!("list{}", children.len()).as_bytes());
            for child in children {
                let mut pair = Vec::with_capacity(96);
                pair.extend_from_slice(&acc);
                pair.extend_from_slice(&deep_hash(child));
                acc = sha384(&pair);
            }
            acc
        }
    }
}

fn sha384(data: &[u8]) -> [u8; 48] {
    let mut out = [0u8; 48];
    out.copy_from_slice(&Sha384::digest(data));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blob_hash_binds_length_tag() {
        let data = b"abc";
        let expected = {
            let mut tagged = sha384(b"blob3").to_vec();
            tagged.extend_from_slice(&sha384(data));
            sha384(&tagged)
        };
        assert_eq!(deep_hash(&DeepHashChunk::Blob(data)), expected);
    }

    #[test]
    fn empty_list_is_tag_hash() {
        assert_eq!(deep_hash(&DeepHashChunk::List(vec![])), sha384(b"list0"));
    }

    #[test]
    fn list_order_matters() {
        let ab = DeepHashChunk::List(vec![DeepHashChunk::Blob(b"a"), DeepHashChunk::Blob(b"b")]);
        let ba = DeepHashChunk::List(vec![DeepHashChunk::Blob(b"b"), DeepHashChunk::Blob(b"a")]);
        assert_ne!(deep_hash(&ab), deep_hash(&ba));
    }

    #[test]
    fn nesting_is_distinguished_from_flat() {
        let flat = DeepHashChunk::List(vec![DeepHashChunk::Blob(b"a")]);
        let nested = DeepHashChunk::List(vec![DeepHashChunk::List(vec![DeepHashChunk::Blob(b"a")])]);
        assert_ne!(deep_hash(&flat), deep_hash(&nested));
    }
}
