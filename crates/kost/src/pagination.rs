//! Fixed-size pages over a result panel

pub const PAGE_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
  page_size: usize,
  start: usize,
}

impl Default for Pager {
  fn default() -> Self {
    Self::new(PAGE_SIZE)
  }
}

impl Pager {
  pub fn new(page_size: usize) -> Self {
    Self { page_size: page_size.max(1), start: 0 }
  }

  pub fn start(&self) -> usize {
    self.start
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  /// Zero-based page number
  pub fn page(&self) -> usize {
    self.start / self.page_size
  }

  pub fn reset(&mut self) {
    self.start = 0;
  }

  /// Advance one page; no-op unless another page starts before `len`
  pub fn next(&mut self, len: usize) -> bool {
    if self.start + self.page_size < len {
      self.start += self.page_size;
      true
    } else {
      false
    }
  }

  pub fn previous(&mut self) -> bool {
    if self.start > 0 {
      self.start = self.start.saturating_sub(self.page_size);
      true
    } else {
      false
    }
  }

  /// The visible slice of `items`
  pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
    let start = self.start.min(items.len());
    let end = (start + self.page_size).min(items.len());
    &items[start..end]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_seventeen_items_page_boundaries() {
    let items: Vec<usize> = (0..17).collect();
    let mut pager = Pager::default();

    assert_eq!(pager.slice(&items), &items[0..8]);

    assert!(pager.next(items.len()));
    assert_eq!(pager.slice(&items), &items[8..16]);

    // 8 + 8 < 17 so the trailing item gets its own page
    assert!(pager.next(items.len()));
    assert_eq!(pager.slice(&items), &[16]);

    assert!(!pager.next(items.len()));
    assert_eq!(pager.start(), 16);
  }

  #[test]
  fn test_next_guard_is_strict() {
    let items: Vec<usize> = (0..16).collect();
    let mut pager = Pager::default();

    assert!(pager.next(items.len()));
    assert!(!pager.next(items.len()));
    assert_eq!(pager.slice(&items), &items[8..16]);
  }

  #[test]
  fn test_previous_stops_at_first_page() {
    let mut pager = Pager::default();
    assert!(!pager.previous());

    pager.next(20);
    assert!(pager.previous());
    assert_eq!(pager.start(), 0);
    assert!(!pager.previous());
  }

  #[test]
  fn test_zero_page_size_is_clamped() {
    let mut pager = Pager::new(0);
    assert_eq!(pager.page_size(), 1);
    assert!(pager.next(2));
    assert_eq!(pager.page(), 1);
  }

  #[test]
  fn test_slice_of_empty_list() {
    let items: Vec<u8> = Vec::new();
    assert!(Pager::default().slice(&items).is_empty());
  }
}
