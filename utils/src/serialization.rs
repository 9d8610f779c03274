//! This adds a few utility functions for serializing and deserializing
//! [arkworks](http://arkworks.rs/) types that implement [CanonicalSerialize] and [CanonicalDeserialize].

use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde_with::Bytes;

//
// Serialization with [serde_with]
//

/// You can use [SerdeAs] with [serde_with] in order to serialize and deserialize types that implement [CanonicalSerialize] and [CanonicalDeserialize],
/// or containers of types that implement these traits (Vec, arrays, etc.)
/// Simply add annotations like `#[serde_as(as = "placeholder_utils::serialization::SerdeAs")]`
/// See <https://docs.rs/serde_with/3.7.0/serde_with/guide/serde_as/index.html>
pub struct SerdeAs;

impl<T> serde_with::SerializeAs<T> for SerdeAs
where
    T: CanonicalSerialize,
{
    fn serialize_as<S>(val: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut bytes = vec![];
        val.serialize_compressed(&mut bytes)
            .map_err(serde::ser::Error::custom)?;

        <Bytes as serde_with::SerializeAs<Vec<u8>>>::serialize_as(&bytes, serializer)
    }
}

impl<'de, T> serde_with::DeserializeAs<'de, T> for SerdeAs
where
    T: CanonicalDeserialize,
{
    fn deserialize_as<D>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bytes: Vec<u8> =
            <Bytes as serde_with::DeserializeAs<'de, Vec<u8>>>::deserialize_as(deserializer)?;
        T::deserialize_compressed(&mut &bytes[..]).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bn254::Fr;
    use serde::{Deserialize, Serialize};
    use serde_with::serde_as;

    #[serde_as]
    #[derive(Serialize, Deserialize, Debug, PartialEq)]
    struct Wrapper {
        #[serde_as(as = "Vec<SerdeAs>")]
        elems: Vec<Fr>,
        #[serde_as(as = "SerdeAs")]
        single: Fr,
    }

    #[test]
    fn test_serde_as() {
        let w = Wrapper {
            elems: vec![Fr::from(3u64), Fr::from(42u64)],
            single: -Fr::from(1u64),
        };
        let bytes = rmp_serde::to_vec(&w).unwrap();
        let back: Wrapper = rmp_serde::from_slice(&bytes).unwrap();
        assert_eq!(w, back);
    }
}
