/// Parse a page range string like "1,3-5" into sorted, deduplicated page numbers.
///
/// Page numbers are 1-based, as in the dump. Every requested page must be
/// one of `available`.
pub fn parse_page_range(input: &str, available: &[usize]) -> Result<Vec<usize>, String> {
    let mut pages = Vec::new();

    let check = |page: usize| -> Result<usize, String> {
        if page == 0 {
            return Err("page 0 is invalid (pages start at 1)".to_string());
        }
        if !available.contains(&page) {
            return Err(format!("page {page} is not in the document"));
        }
        Ok(page)
    };
    let number = |text: &str| -> Result<usize, String> {
        text.trim()
            .parse()
            .map_err(|_| format!("invalid page number: '{}'", text.trim()))
    };

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = number(start)?;
            let end = number(end)?;
            if start > end {
                return Err(format!("invalid page range: '{part}'"));
            }
            for page in start..=end {
                pages.push(check(page)?);
            }
        } else {
            pages.push(check(number(part)?)?);
        }
    }

    if pages.is_empty() {
        return Err(format!("empty page range: '{input}'"));
    }
    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}
