//! A minimal selector language: the selector enumerates the links to visit.
//!
//! The wire form is a prost message listing content identifiers. The
//! traversal visits the root first, then each listed link in order,
//! skipping duplicates of the root. Richer selector languages plug in
//! through the same [SelectorEngine] seam.

use bytes::{Bytes, BytesMut};
use graphweft_api::{
    DynSelectorEngine, DynTraversal, Link, SelectorEngine, Traversal,
    WeftError, WeftResult,
};
use prost::Message;
use std::collections::VecDeque;
use std::sync::Arc;

/// Wire form of an enumerated selector.
#[derive(Clone, PartialEq, prost::Message)]
pub struct EnumeratedSelector {
    /// The content identifiers to visit, in order.
    #[prost(bytes = "bytes", repeated, tag = "1")]
    pub links: Vec<Bytes>,
}

/// Encode a list of links as an enumerated selector.
pub fn encode_selector(links: &[Link]) -> Bytes {
    let mut out = BytesMut::new();
    let selector = EnumeratedSelector {
        links: links.iter().map(|l| l.0 .0.clone()).collect(),
    };
    selector
        .encode(&mut out)
        .expect("failed to encode selector");
    out.freeze()
}

/// A [SelectorEngine] for enumerated selectors.
#[derive(Debug)]
pub struct EnumeratedSelectorEngine {}

impl EnumeratedSelectorEngine {
    /// Construct a new engine as a trait object.
    pub fn create() -> DynSelectorEngine {
        Arc::new(Self {})
    }
}

impl SelectorEngine for EnumeratedSelectorEngine {
    fn compile(
        &self,
        root: Link,
        selector: Bytes,
    ) -> WeftResult<DynTraversal> {
        let decoded = EnumeratedSelector::decode(selector).map_err(|err| {
            WeftError::other_src("could not decode enumerated selector", err)
        })?;
        let mut pending = VecDeque::with_capacity(decoded.links.len() + 1);
        pending.push_back(root.clone());
        for link in decoded.links {
            let link = Link::from(link);
            if link != root {
                pending.push_back(link);
            }
        }
        Ok(Box::new(EnumeratedTraversal { pending }))
    }
}

/// Cursor over the remaining enumerated links.
struct EnumeratedTraversal {
    pending: VecDeque<Link>,
}

impl Traversal for EnumeratedTraversal {
    fn next_link(&mut self) -> Option<Link> {
        self.pending.pop_front()
    }

    fn advance(
        &mut self,
        _link: &Link,
        _data: &Bytes,
    ) -> WeftResult<()> {
        // enumerated selections carry no nested links to discover
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use graphweft_test_utils::id::random_link;

    #[test]
    fn traversal_visits_root_then_listed_links() {
        let root = random_link();
        let links = vec![random_link(), random_link()];
        let selector = encode_selector(&links);

        let engine = EnumeratedSelectorEngine {};
        let mut traversal = engine.compile(root.clone(), selector).unwrap();

        assert_eq!(Some(root), traversal.next_link());
        for link in links {
            assert_eq!(Some(link.clone()), traversal.next_link());
            traversal
                .advance(&link, &Bytes::from_static(b"data"))
                .unwrap();
        }
        assert_eq!(None, traversal.next_link());
    }

    #[test]
    fn root_is_not_visited_twice() {
        let root = random_link();
        let other = random_link();
        let selector = encode_selector(&[root.clone(), other.clone()]);

        let engine = EnumeratedSelectorEngine {};
        let mut traversal = engine.compile(root.clone(), selector).unwrap();

        assert_eq!(Some(root), traversal.next_link());
        assert_eq!(Some(other), traversal.next_link());
        assert_eq!(None, traversal.next_link());
    }

    #[test]
    fn malformed_selector_fails_to_compile() {
        let engine = EnumeratedSelectorEngine {};
        engine
            .compile(random_link(), Bytes::from_static(&[0xff]))
            .err()
            .unwrap();
    }
}
