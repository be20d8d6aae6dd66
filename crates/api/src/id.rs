//! Types dealing with data identity.

macro_rules! imp_deref {
    ($i:ty, $t:ty) => {
        impl std::ops::Deref for $i {
            type Target = $t;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

macro_rules! imp_from {
    ($a:ty, $b:ty, $i:ident => $e:expr) => {
        impl From<$b> for $a {
            fn from($i: $b) -> Self {
                $e
            }
        }
    };
}

fn display_base64(
    b: &bytes::Bytes,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    use base64::prelude::*;
    f.write_str(&BASE64_URL_SAFE_NO_PAD.encode(b))
}

/// Base data identity type meant for newtyping.
/// You probably want [PeerId] or [Link].
///
/// In GraphWeft these bytes should ONLY be the actual hash bytes
/// or public key of the identity being tracked, without
/// prefix or suffix.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Id(#[serde(with = "crate::serde_bytes_base64")] pub bytes::Bytes);

imp_deref!(Id, bytes::Bytes);
imp_from!(Id, bytes::Bytes, b => Id(b));

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0, f)
    }
}

impl std::fmt::Debug for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0, f)
    }
}

/// Identifies a remote peer making requests against the local store.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct PeerId(pub Id);

imp_deref!(PeerId, Id);
imp_from!(PeerId, bytes::Bytes, b => PeerId(Id(b)));
imp_from!(PeerId, Id, b => PeerId(b));

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0 .0, f)
    }
}

impl std::fmt::Debug for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0 .0, f)
    }
}

/// A content identifier: the hash of one content-addressed block.
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Link(pub Id);

imp_deref!(Link, Id);
imp_from!(Link, bytes::Bytes, b => Link(Id(b)));
imp_from!(Link, Id, b => Link(b));

impl std::fmt::Display for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0 .0, f)
    }
}

impl std::fmt::Debug for Link {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display_base64(&self.0 .0, f)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn id_serde_fixtures() {
        const F: &[(&[u8], &str)] = &[
            (b"test-hash-1", "\"dGVzdC1oYXNoLTE\""),
            (b"s", "\"cw\""),
            (&[255, 255, 255, 255, 255, 255, 255], "\"_________w\""),
        ];

        for (d, e) in F.iter() {
            let r = serde_json::to_string(&Id(bytes::Bytes::from_static(d)))
                .unwrap();
            assert_eq!(e, &r);
            let r: PeerId = serde_json::from_str(e).unwrap();
            assert_eq!(d, &r.0 .0);
            let r: Link = serde_json::from_str(e).unwrap();
            assert_eq!(d, &r.0 .0);
        }
    }

    #[test]
    fn display_is_base64() {
        assert_eq!(
            "dGVzdC1oYXNoLTE",
            Link::from(bytes::Bytes::from_static(b"test-hash-1")).to_string(),
        );
    }
}
