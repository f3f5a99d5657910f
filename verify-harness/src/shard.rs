use std::error::Error;
use std::fmt;

/// One CI worker's slice of the enumerated test list.
///
/// The test at 0-based position `p` in the enumeration order belongs to shard
/// `p % total`, so the shards for `index = 0..total` partition the full list:
/// every test runs in exactly one shard and the workers need no coordination.
/// Positions refer to the runner's own listing order, which callers must not
/// reorder between enumeration and selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shard {
  index: usize,
  total: usize,
}

/// Rejected shard configuration. Raised before any test runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidShard {
  ZeroTotal,
  IndexOutOfRange { index: usize, total: usize },
}

impl fmt::Display for InvalidShard {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      InvalidShard::ZeroTotal => f.write_str("shard total must be greater than zero"),
      InvalidShard::IndexOutOfRange { index, total } => {
        write!(f, "shard index {index} is out of range for {total} shard(s)")
      }
    }
  }
}

impl Error for InvalidShard {}

impl Shard {
  pub fn new(index: usize, total: usize) -> Result<Self, InvalidShard> {
    if total == 0 {
      return Err(InvalidShard::ZeroTotal);
    }
    if index >= total {
      return Err(InvalidShard::IndexOutOfRange { index, total });
    }
    Ok(Self { index, total })
  }

  pub fn index(&self) -> usize {
    self.index
  }

  pub fn total(&self) -> usize {
    self.total
  }

  /// Whether this shard owns the item at the given 0-based position.
  pub fn includes(&self, position: usize) -> bool {
    position % self.total == self.index
  }
}

/// Keeps the items owned by `shard`, preserving their order.
///
/// `None` keeps everything: an invocation without a shard index is an ad-hoc
/// full run, not an empty one.
pub fn apply_shard<T>(items: Vec<T>, shard: Option<Shard>) -> Vec<T> {
  let Some(shard) = shard else {
    return items;
  };
  items
    .into_iter()
    .enumerate()
    .filter(|(position, _)| shard.includes(*position))
    .map(|(_, item)| item)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stride_selects_every_nth_item() {
    let tests = vec!["t0", "t1", "t2", "t3", "t4", "t5", "t6"];

    let shard = |index| Some(Shard::new(index, 3).unwrap());
    assert_eq!(apply_shard(tests.clone(), shard(0)), vec!["t0", "t3", "t6"]);
    assert_eq!(apply_shard(tests.clone(), shard(1)), vec!["t1", "t4"]);
    assert_eq!(apply_shard(tests, shard(2)), vec!["t2", "t5"]);
  }

  #[test]
  fn shards_partition_the_full_list() {
    let items: Vec<usize> = (0..23).collect();
    let total = 5;

    let mut seen = vec![0usize; items.len()];
    for index in 0..total {
      let shard = Shard::new(index, total).unwrap();
      for item in apply_shard(items.clone(), Some(shard)) {
        seen[item] += 1;
      }
    }

    assert!(seen.iter().all(|count| *count == 1));
  }

  #[test]
  fn selection_is_deterministic_and_ordered() {
    let items = vec!["e", "a", "d", "b", "c"];
    let shard = Some(Shard::new(1, 2).unwrap());

    let first = apply_shard(items.clone(), shard);
    let second = apply_shard(items, shard);

    assert_eq!(first, second);
    assert_eq!(first, vec!["a", "b"]);
  }

  #[test]
  fn absent_shard_keeps_every_item() {
    let items = vec![1, 2, 3];
    assert_eq!(apply_shard(items.clone(), None), items);
  }

  #[test]
  fn invalid_configurations_are_rejected() {
    assert_eq!(Shard::new(0, 0), Err(InvalidShard::ZeroTotal));
    assert_eq!(
      Shard::new(3, 3),
      Err(InvalidShard::IndexOutOfRange { index: 3, total: 3 })
    );
    assert!(Shard::new(2, 3).is_ok());
  }
}
