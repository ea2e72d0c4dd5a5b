//! Ordered index from high keys to containers.
//!
//! Keys and containers live in parallel vectors, binary-searched by key.
//! Containers are reference-counted: cloning a bitmap shares them, and
//! every mutation path goes through [`ChunkArray::container_mut`], which
//! deep-copies a shared container before handing out `&mut` access. The
//! strong count is the copy-on-write flag.

use std::sync::Arc;

use crate::container::Container;

#[derive(Clone, Debug, Default)]
pub(crate) struct ChunkArray {
    keys: Vec<u16>,
    containers: Vec<Arc<Container>>,
}

impl ChunkArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key_at(&self, i: usize) -> u16 {
        self.keys[i]
    }

    pub fn container_at(&self, i: usize) -> &Container {
        &self.containers[i]
    }

    /// Mutable access to the container at `i`; deep-copies first when it
    /// is shared with another bitmap.
    pub fn container_mut(&mut self, i: usize) -> &mut Container {
        Arc::make_mut(&mut self.containers[i])
    }

    /// `Ok(position)` when `key` is present, `Err(insertion point)` when
    /// absent.
    pub fn search(&self, key: u16) -> Result<usize, usize> {
        self.keys.binary_search(&key)
    }

    pub fn get(&self, key: u16) -> Option<&Container> {
        self.search(key).ok().map(|i| &*self.containers[i])
    }

    pub fn insert_at(&mut self, i: usize, key: u16, container: Arc<Container>) {
        self.keys.insert(i, key);
        self.containers.insert(i, container);
    }

    pub fn remove_at(&mut self, i: usize) {
        self.keys.remove(i);
        self.containers.remove(i);
    }

    /// Replace the container at `i` without touching the shared original.
    pub fn set_at(&mut self, i: usize, container: Container) {
        self.containers[i] = Arc::new(container);
    }

    /// Push an entry whose key is greater than every present key.
    pub fn append(&mut self, key: u16, container: Arc<Container>) {
        debug_assert!(self.keys.last().map_or(true, |&k| k < key));
        self.keys.push(key);
        self.containers.push(container);
    }

    /// Push an entry, merging into the tail when the key matches. Offset
    /// shifts use this: two source chunks can land on one destination key
    /// with disjoint low ranges.
    pub fn append_or(&mut self, key: u16, container: Container) {
        if self.keys.last() == Some(&key) {
            let i = self.containers.len() - 1;
            Arc::make_mut(&mut self.containers[i]).or_assign(&container);
        } else {
            self.append(key, Arc::new(container));
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.containers.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &Arc<Container>)> + '_ {
        self.keys.iter().copied().zip(self.containers.iter())
    }

    /// In-place union: both-sided keys merge containers, one-sided keys
    /// are kept (borrowing the other side's container on its keys).
    pub fn or_with(&mut self, other: &ChunkArray) {
        let lhs = std::mem::take(self);
        self.keys.reserve(lhs.len().max(other.len()));
        self.containers.reserve(lhs.len().max(other.len()));
        let mut lhs_iter = lhs.keys.into_iter().zip(lhs.containers).peekable();
        let mut rhs_iter = other.iter().peekable();
        loop {
            match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(&(lk, _)), Some(&(rk, _))) => {
                    if lk < rk {
                        let (k, c) = lhs_iter.next().unwrap();
                        self.append(k, c);
                    } else if lk > rk {
                        let (k, c) = rhs_iter.next().unwrap();
                        self.append(k, Arc::clone(c));
                    } else {
                        let (k, mut c) = lhs_iter.next().unwrap();
                        let (_, rc) = rhs_iter.next().unwrap();
                        Arc::make_mut(&mut c).or_assign(rc);
                        self.append(k, c);
                    }
                }
                (Some(_), None) => {
                    let (k, c) = lhs_iter.next().unwrap();
                    self.append(k, c);
                }
                (None, Some(_)) => {
                    let (k, c) = rhs_iter.next().unwrap();
                    self.append(k, Arc::clone(c));
                }
                (None, None) => break,
            }
        }
    }

    /// In-place intersection: only both-sided keys survive, and only when
    /// the merged container is non-empty.
    pub fn and_with(&mut self, other: &ChunkArray) {
        let lhs = std::mem::take(self);
        let mut lhs_iter = lhs.keys.into_iter().zip(lhs.containers).peekable();
        let mut rhs_iter = other.iter().peekable();
        while let (Some(&(lk, _)), Some(&(rk, _))) = (lhs_iter.peek(), rhs_iter.peek()) {
            if lk < rk {
                lhs_iter.next();
            } else if lk > rk {
                rhs_iter.next();
            } else {
                let (k, mut c) = lhs_iter.next().unwrap();
                let (_, rc) = rhs_iter.next().unwrap();
                Arc::make_mut(&mut c).and_assign(rc);
                if !c.is_empty() {
                    self.append(k, c);
                }
            }
        }
    }

    /// In-place symmetric difference.
    pub fn xor_with(&mut self, other: &ChunkArray) {
        let lhs = std::mem::take(self);
        let mut lhs_iter = lhs.keys.into_iter().zip(lhs.containers).peekable();
        let mut rhs_iter = other.iter().peekable();
        loop {
            match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(&(lk, _)), Some(&(rk, _))) => {
                    if lk < rk {
                        let (k, c) = lhs_iter.next().unwrap();
                        self.append(k, c);
                    } else if lk > rk {
                        let (k, c) = rhs_iter.next().unwrap();
                        self.append(k, Arc::clone(c));
                    } else {
                        let (k, mut c) = lhs_iter.next().unwrap();
                        let (_, rc) = rhs_iter.next().unwrap();
                        Arc::make_mut(&mut c).xor_assign(rc);
                        if !c.is_empty() {
                            self.append(k, c);
                        }
                    }
                }
                (Some(_), None) => {
                    let (k, c) = lhs_iter.next().unwrap();
                    self.append(k, c);
                }
                (None, Some(_)) => {
                    let (k, c) = rhs_iter.next().unwrap();
                    self.append(k, Arc::clone(c));
                }
                (None, None) => break,
            }
        }
    }

    /// In-place difference: keys only on the right are dropped, keys only
    /// on the left are kept.
    pub fn and_not_with(&mut self, other: &ChunkArray) {
        let lhs = std::mem::take(self);
        let mut lhs_iter = lhs.keys.into_iter().zip(lhs.containers).peekable();
        let mut rhs_iter = other.iter().peekable();
        loop {
            match (lhs_iter.peek(), rhs_iter.peek()) {
                (Some(&(lk, _)), Some(&(rk, _))) => {
                    if lk < rk {
                        let (k, c) = lhs_iter.next().unwrap();
                        self.append(k, c);
                    } else if lk > rk {
                        rhs_iter.next();
                    } else {
                        let (k, mut c) = lhs_iter.next().unwrap();
                        let (_, rc) = rhs_iter.next().unwrap();
                        Arc::make_mut(&mut c).and_not_assign(rc);
                        if !c.is_empty() {
                            self.append(k, c);
                        }
                    }
                }
                (Some(_), None) => {
                    let (k, c) = lhs_iter.next().unwrap();
                    self.append(k, c);
                }
                (None, _) => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk_of(values: &[u16]) -> Arc<Container> {
        let mut c = Container::new();
        for &v in values {
            c.insert(v);
        }
        Arc::new(c)
    }

    fn keys(chunks: &ChunkArray) -> Vec<u16> {
        chunks.iter().map(|(k, _)| k).collect()
    }

    #[test]
    fn test_search_and_insert_order() {
        let mut chunks = ChunkArray::new();
        chunks.append(1, chunk_of(&[5]));
        chunks.append(4, chunk_of(&[6]));
        assert_eq!(chunks.search(1), Ok(0));
        assert_eq!(chunks.search(4), Ok(1));
        assert_eq!(chunks.search(0), Err(0));
        assert_eq!(chunks.search(2), Err(1));
        assert_eq!(chunks.search(9), Err(2));
        chunks.insert_at(1, 2, chunk_of(&[7]));
        assert_eq!(keys(&chunks), vec![1, 2, 4]);
        chunks.remove_at(0);
        assert_eq!(keys(&chunks), vec![2, 4]);
    }

    #[test]
    fn test_or_with_borrows_right_only_chunks() {
        let mut a = ChunkArray::new();
        a.append(0, chunk_of(&[1]));
        a.append(2, chunk_of(&[2]));
        let mut b = ChunkArray::new();
        b.append(1, chunk_of(&[3]));
        b.append(2, chunk_of(&[4]));

        a.or_with(&b);
        assert_eq!(keys(&a), vec![0, 1, 2]);
        assert!(a.get(2).unwrap().contains(2));
        assert!(a.get(2).unwrap().contains(4));
        // the right-only chunk is shared, not copied
        assert_eq!(Arc::strong_count(&b.containers[0]), 2);
    }

    #[test]
    fn test_and_with_drops_one_sided_and_empty() {
        let mut a = ChunkArray::new();
        a.append(0, chunk_of(&[1]));
        a.append(1, chunk_of(&[2]));
        a.append(2, chunk_of(&[3]));
        let mut b = ChunkArray::new();
        b.append(1, chunk_of(&[9]));
        b.append(2, chunk_of(&[3]));

        a.and_with(&b);
        // key 0 is left-only, key 1 intersects to empty
        assert_eq!(keys(&a), vec![2]);
        assert!(a.get(2).unwrap().contains(3));
    }

    #[test]
    fn test_xor_and_not_with() {
        let mut a = ChunkArray::new();
        a.append(0, chunk_of(&[1, 2]));
        a.append(1, chunk_of(&[5]));
        let mut b = ChunkArray::new();
        b.append(0, chunk_of(&[2, 3]));
        b.append(2, chunk_of(&[6]));

        let mut x = a.clone();
        x.xor_with(&b);
        assert_eq!(keys(&x), vec![0, 1, 2]);
        let c0 = x.get(0).unwrap();
        assert!(c0.contains(1) && !c0.contains(2) && c0.contains(3));

        a.and_not_with(&b);
        assert_eq!(keys(&a), vec![0, 1]);
        let c0 = a.get(0).unwrap();
        assert!(c0.contains(1) && !c0.contains(2));
    }

    #[test]
    fn test_container_mut_unshares() {
        let mut a = ChunkArray::new();
        a.append(0, chunk_of(&[1]));
        let b = a.clone();
        a.container_mut(0).insert(9);
        assert!(a.get(0).unwrap().contains(9));
        assert!(!b.get(0).unwrap().contains(9));
    }
}
