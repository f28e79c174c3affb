use std::path::Path;

use textlayer_core::normalize::page_text;

use crate::cli::TextFormat;
use crate::shared::{ProgressReporter, load_dump, resolve_pages, to_json};

pub fn run(file: &Path, pages: Option<&str>, format: &TextFormat) -> Result<(), i32> {
    let dump = load_dump(file)?;
    let pages = resolve_pages(pages, &dump)?;
    let progress = ProgressReporter::new(pages.len());

    for (i, page) in pages.iter().enumerate() {
        progress.report(i + 1);
        let text = page_text(&page.fragments());

        match format {
            TextFormat::Text => {
                println!("--- Page {} ---", page.page_number);
                println!("{text}");
            }
            TextFormat::Json => {
                let obj = serde_json::json!({
                    "page": page.page_number,
                    "text": text,
                });
                println!("{}", to_json(&obj)?);
            }
        }
    }

    progress.finish();
    Ok(())
}
