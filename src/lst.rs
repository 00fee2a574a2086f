//! Slice helpers

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::hash::Hash;

/// Split into chunks of `size`; the last chunk may be shorter.
///
/// `size` must be between 1 and `items.len()`.
pub fn chunks<T: Clone>(items: &[T], size: usize) -> Result<Vec<Vec<T>>> {
    if size < 1 || size > items.len() {
        return Err(Error::invalid(format!("invalid chunk size: {}", size)));
    }
    Ok(items.chunks(size).map(<[T]>::to_vec).collect())
}

/// Split into `parts` consecutive pieces. Earlier pieces are never longer
/// than later ones: `[1, 2, 3, 4, 5]` in 3 parts is `[[1], [2, 3], [4, 5]]`.
pub fn split<T: Clone>(items: &[T], parts: usize) -> Result<Vec<Vec<T>>> {
    if parts < 1 || parts > items.len() {
        return Err(Error::invalid(format!("invalid number of parts: {}", parts)));
    }
    let mut out = Vec::with_capacity(parts);
    let mut rest = items;
    for remaining in (1..=parts).rev() {
        let (head, tail) = rest.split_at(rest.len() / remaining);
        out.push(head.to_vec());
        rest = tail;
    }
    Ok(out)
}

fn counts<T: Eq + Hash + Clone>(items: &[T]) -> Vec<(T, usize)> {
    let mut index: HashMap<&T, usize> = HashMap::new();
    let mut ordered: Vec<(T, usize)> = Vec::new();
    for item in items {
        match index.get(item) {
            Some(&i) => ordered[i].1 += 1,
            None => {
                index.insert(item, ordered.len());
                ordered.push((item.clone(), 1));
            }
        }
    }
    ordered
}

/// Values that appear exactly once, in first-seen order.
pub fn unique<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    counts(items)
        .into_iter()
        .filter(|(_, n)| *n == 1)
        .map(|(v, _)| v)
        .collect()
}

/// Values that appear more than once, each listed once, in first-seen order.
pub fn non_unique<T: Eq + Hash + Clone>(items: &[T]) -> Vec<T> {
    counts(items)
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(v, _)| v)
        .collect()
}

/// Every `n`-th element, starting with the `n`-th.
pub fn every_nth<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    if n == 0 {
        return Vec::new();
    }
    items.iter().skip(n - 1).step_by(n).cloned().collect()
}

pub fn occurrences<T: PartialEq>(items: &[T], value: &T) -> usize {
    items.iter().filter(|i| *i == value).count()
}

/// Drop repeated values, keeping the first occurrence.
pub fn nodups<T: PartialEq + Clone>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}

/// Replace each non-overlapping occurrence of `sublist`, scanning left to
/// right. An empty `sublist` matches nothing.
pub fn replace_sublists<T: PartialEq + Clone>(items: &[T], sublist: &[T], replacement: &[T]) -> Vec<T> {
    if sublist.is_empty() {
        return items.to_vec();
    }
    let mut out = Vec::with_capacity(items.len());
    let mut i = 0;
    while i + sublist.len() <= items.len() {
        if items[i..].starts_with(sublist) {
            out.extend_from_slice(replacement);
            i += sublist.len();
        } else {
            out.push(items[i].clone());
            i += 1;
        }
    }
    out.extend_from_slice(&items[i..]);
    out
}

pub fn contains_sublist<T: PartialEq>(items: &[T], sublist: &[T]) -> bool {
    sublist.is_empty() || items.windows(sublist.len()).any(|w| w == sublist)
}
