use std::path::Path;

use crate::cli::OutputFormat;
use crate::shared::{PageDump, ProgressReporter, csv_escape, load_dump, resolve_pages, to_json};

pub fn run(file: &Path, pages: Option<&str>, format: &OutputFormat) -> Result<(), i32> {
    let dump = load_dump(file)?;
    let pages = resolve_pages(pages, &dump)?;
    let progress = ProgressReporter::new(pages.len());

    match format {
        OutputFormat::Text => write_text(&pages, &progress),
        OutputFormat::Json => write_json(&pages, &progress)?,
        OutputFormat::Csv => write_csv(&pages, &progress),
    }

    progress.finish();
    Ok(())
}

fn write_text(pages: &[&PageDump], progress: &ProgressReporter) {
    println!("page\tx\ty\twidth\teol\ttext");

    for (i, page) in pages.iter().enumerate() {
        progress.report(i + 1);
        for fragment in page.fragments() {
            println!(
                "{}\t{:.2}\t{:.2}\t{:.2}\t{}\t{}",
                page.page_number,
                fragment.x(),
                fragment.y(),
                fragment.width,
                fragment.line_terminal,
                fragment.text,
            );
        }
    }
}

fn write_json(pages: &[&PageDump], progress: &ProgressReporter) -> Result<(), i32> {
    let mut all = Vec::new();

    for (i, page) in pages.iter().enumerate() {
        progress.report(i + 1);
        for fragment in page.fragments() {
            all.push(serde_json::json!({
                "page": page.page_number,
                "x": fragment.x(),
                "y": fragment.y(),
                "width": fragment.width,
                "height": fragment.height,
                "eol": fragment.line_terminal,
                "text": fragment.text,
                "fontName": fragment.font_name,
            }));
        }
    }

    println!("{}", to_json(&serde_json::Value::Array(all))?);
    Ok(())
}

fn write_csv(pages: &[&PageDump], progress: &ProgressReporter) {
    println!("page,x,y,width,eol,text");

    for (i, page) in pages.iter().enumerate() {
        progress.report(i + 1);
        for fragment in page.fragments() {
            println!(
                "{},{:.2},{:.2},{:.2},{},{}",
                page.page_number,
                fragment.x(),
                fragment.y(),
                fragment.width,
                fragment.line_terminal,
                csv_escape(&fragment.text),
            );
        }
    }
}
