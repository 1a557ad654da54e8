//! Pagination of the chosen images into album pages.
//!
//! Pages are computed views over a slice; nothing is copied. Page 1 is
//! `index.html`, page N is `page-N.html`, and every image lands on exactly
//! one page in its original order. An empty slice yields no pages at all.

use crate::naming::album_page_filename;

/// One album page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// 1-based page number.
    pub number: usize,
    pub total_pages: usize,
    pub images: &'a [T],
    pub filename: String,
    pub previous_url: Option<String>,
    pub next_url: Option<String>,
}

/// Number of pages for `count` items. `page_size` must be at least 1.
pub fn page_count(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// 1-based number of the page holding the image at flat `index`.
pub fn page_of(index: usize, page_size: usize) -> usize {
    index / page_size.max(1) + 1
}

/// Split `items` into pages of `page_size`.
pub fn paginate<T>(items: &[T], page_size: usize) -> Vec<Page<'_, T>> {
    debug_assert!(page_size >= 1, "page_size must be validated by the caller");
    let page_size = page_size.max(1);
    let total_pages = page_count(items.len(), page_size);

    items
        .chunks(page_size)
        .enumerate()
        .map(|(i, images)| {
            let number = i + 1;
            Page {
                number,
                total_pages,
                images,
                filename: album_page_filename(number),
                previous_url: (number > 1).then(|| album_page_filename(number - 1)),
                next_url: (number < total_pages).then(|| album_page_filename(number + 1)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_no_pages() {
        let pages = paginate::<u32>(&[], 10);
        assert!(pages.is_empty());
        assert_eq!(page_count(0, 10), 0);
    }

    #[test]
    fn page_size_one_over_three_images() {
        let items = ["a", "b", "c"];
        let pages = paginate(&items, 1);

        assert_eq!(pages.len(), 3);
        let second = &pages[1];
        assert_eq!(second.filename, "page-2.html");
        assert_eq!(second.previous_url.as_deref(), Some("index.html"));
        assert_eq!(second.next_url.as_deref(), Some("page-3.html"));
        assert_eq!(second.images, &["b"]);
    }

    #[test]
    fn first_and_last_pages_have_no_outward_links() {
        let items: Vec<u32> = (0..7).collect();
        let pages = paginate(&items, 3);

        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].number, 1);
        assert_eq!(pages[0].filename, "index.html");
        assert_eq!(pages[0].previous_url, None);
        assert_eq!(pages[2].number, pages[2].total_pages);
        assert_eq!(pages[2].next_url, None);
        assert_eq!(pages[2].images, &[6]);
    }

    #[test]
    fn single_page_has_no_links() {
        let pages = paginate(&[1, 2], 50);
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].previous_url, None);
        assert_eq!(pages[0].next_url, None);
        assert_eq!(pages[0].total_pages, 1);
    }

    #[test]
    fn pages_cover_every_item_once_in_order() {
        for n in 0..25usize {
            for p in 1..8usize {
                let items: Vec<usize> = (0..n).collect();
                let pages = paginate(&items, p);

                assert_eq!(pages.len(), n.div_ceil(p), "n={n} p={p}");
                let flattened: Vec<usize> =
                    pages.iter().flat_map(|pg| pg.images.iter().copied()).collect();
                assert_eq!(flattened, items, "n={n} p={p}");
            }
        }
    }

    #[test]
    fn middle_pages_link_to_neighbours() {
        let items: Vec<u32> = (0..10).collect();
        let pages = paginate(&items, 2);
        for k in 1..pages.len() - 1 {
            let page = &pages[k];
            assert_eq!(page.previous_url.as_ref(), Some(&pages[k - 1].filename));
            assert_eq!(page.next_url.as_ref(), Some(&pages[k + 1].filename));
        }
    }

    #[test]
    fn page_of_matches_pagination() {
        let items: Vec<usize> = (0..11).collect();
        for page in paginate(&items, 4) {
            for &index in page.images {
                assert_eq!(page_of(index, 4), page.number);
            }
        }
    }
}
