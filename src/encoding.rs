use bincode::Options;

use crate::DbResult;

/// Big-endian fixed-width integers, so encoded ids sort the same way as
/// their numeric values inside a sled tree.
fn options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_big_endian()
        .with_fixint_encoding()
        .allow_trailing_bytes()
}

pub(crate) fn encode<S: ?Sized + serde::Serialize>(item: &S) -> DbResult<Vec<u8>> {
    Ok(options().serialize(item)?)
}

pub(crate) fn decode<'a, T: serde::Deserialize<'a>>(bytes: &'a [u8]) -> DbResult<T> {
    Ok(options().deserialize(bytes)?)
}

/// Counter step for `fetch_and_update`. A missing or malformed value restarts at 1.
pub(crate) fn increment(old: Option<&[u8]>) -> Option<Vec<u8>> {
    let next = match old.and_then(|bytes| <[u8; 8]>::try_from(bytes).ok()) {
        Some(bytes) => u64::from_be_bytes(bytes) + 1,
        None => 1,
    };

    Some(next.to_be_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_ids_sort_numerically() {
        let small = encode(&2u64).unwrap();
        let large = encode(&256u64).unwrap();

        assert!(small < large);
        assert_eq!(decode::<u64>(&large).unwrap(), 256);
    }

    #[test]
    fn increment_counts_from_one() {
        let first = increment(None).unwrap();
        assert_eq!(decode::<u64>(&first).unwrap(), 1);

        let second = increment(Some(&first)).unwrap();
        assert_eq!(decode::<u64>(&second).unwrap(), 2);
    }
}
