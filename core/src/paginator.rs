use std::fmt;

/// A consecutive run of items from a result list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page<'a, T>(pub &'a [T]);

impl<T> Page<'_, T> {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: fmt::Display> fmt::Display for Page<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.0 {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Split `items` into pages of `page_size`; the last page may be shorter.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<Page<'_, T>> {
    items.chunks(page_size.max(1)).map(Page).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_holds_remainder() {
        let items = [1, 2, 3, 4, 5];
        let pages = paginate(&items, 2);
        assert_eq!(pages.iter().map(Page::len).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert_eq!(pages[2].to_string(), "5");
    }

    #[test]
    fn empty_input_has_no_pages() {
        assert!(paginate::<i32>(&[], 3).is_empty());
        assert_eq!(paginate(&[1, 2], 0).len(), 2);
    }
}
