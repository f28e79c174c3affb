use std::collections::BTreeMap;
use std::path::Path;

use textlayer_core::{
    DocumentLayout, HighlightKind, MeasuredPage, PageInput, PageViewport, Rect, Rotation, SearchOptions,
    SearchSession, SearchStatus, SessionOptions, TextFragment, Zoom,
};

use crate::cli::OutputFormat;
use crate::shared::{PageDump, ProgressReporter, load_dump, resolve_pages, to_json};

/// Search settings gathered from the command line.
pub struct SearchArgs<'a> {
    pub query: &'a str,
    pub pages: Option<&'a str>,
    pub case_sensitive: bool,
    pub scale: i64,
    pub rotation: i32,
    pub current: usize,
}

/// One highlight rectangle ready for output.
struct Row {
    page: usize,
    match_index: usize,
    kind: HighlightKind,
    rect: Rect,
}

pub fn run(file: &Path, args: &SearchArgs<'_>, format: &OutputFormat) -> Result<(), i32> {
    let dump = load_dump(file)?;
    let selected = resolve_pages(args.pages, &dump)?;
    let user_rotation = Rotation::from_degrees(args.rotation).map_err(|e| {
        eprintln!("Error: {e}");
        1
    })?;
    let zoom = Zoom::new(args.scale);

    let mounted = mount(&selected, zoom, user_rotation)?;

    let mut session: SearchSession = SearchSession::with_options(SessionOptions {
        search: SearchOptions {
            case_sensitive: args.case_sensitive,
        },
        ..SessionOptions::default()
    });
    session.open();
    session.set_query(args.query, &mounted);
    if args.current > 1 && !session.select(args.current - 1) {
        tracing::warn!(
            requested = args.current,
            total = session.matches().len(),
            "current match out of range, using the first"
        );
    }

    let rows: Vec<Row> = mounted
        .keys()
        .flat_map(|&page| {
            session.page_highlights(page).map(move |(rect, kind)| Row {
                page,
                match_index: rect.match_index,
                kind,
                rect: rect.rect(),
            })
        })
        .collect();

    match format {
        OutputFormat::Text => write_text(&rows),
        OutputFormat::Json => write_json(&rows, args.query, session.status())?,
        OutputFormat::Csv => write_csv(&rows),
    }

    let status = session.status();
    if status != SearchStatus::Hidden {
        eprintln!("{status}");
    }
    Ok(())
}

/// Normalize and lay out the selected pages, stacked as in the viewer.
fn mount(
    pages: &[&PageDump],
    zoom: Zoom,
    user_rotation: Rotation,
) -> Result<BTreeMap<usize, MeasuredPage>, i32> {
    let progress = ProgressReporter::new(pages.len());
    let mut prepared: Vec<(usize, PageViewport, Vec<TextFragment>)> = Vec::with_capacity(pages.len());

    for (i, page) in pages.iter().enumerate() {
        progress.report(i + 1);
        let rotation = Rotation::from_degrees(page.rotate)
            .map(|own| own.combine(user_rotation))
            .map_err(|e| {
                eprintln!("Error: page {}: {e}", page.page_number);
                1
            })?;
        let viewport = PageViewport::new(page.width, page.height, zoom.factor(), rotation).map_err(|e| {
            eprintln!("Error: page {}: {e}", page.page_number);
            1
        })?;
        prepared.push((page.page_number, viewport, page.fragments()));
    }
    progress.finish();

    let layout = DocumentLayout::default();
    let mounted = layout.lay_out(prepared.iter().map(|(page_number, viewport, fragments)| PageInput {
        page_number: *page_number,
        viewport: *viewport,
        fragments: Some(fragments.as_slice()),
    }));
    tracing::debug!(pages = mounted.len(), scale = zoom.percent(), "mounted pages");
    Ok(mounted)
}

fn is_current(kind: HighlightKind) -> bool {
    kind == HighlightKind::Current
}

fn write_text(rows: &[Row]) {
    println!("page\tmatch\tcurrent\ttop\tleft\twidth\theight");
    for row in rows {
        println!(
            "{}\t{}\t{}\t{:.2}\t{:.2}\t{:.2}\t{:.2}",
            row.page,
            row.match_index,
            is_current(row.kind),
            row.rect.top,
            row.rect.left,
            row.rect.width,
            row.rect.height,
        );
    }
}

fn write_json(rows: &[Row], query: &str, status: SearchStatus) -> Result<(), i32> {
    let (current, total) = match status {
        SearchStatus::Position { current, total } => (current, total),
        SearchStatus::Hidden | SearchStatus::NoMatches => (0, 0),
    };
    let highlights: Vec<serde_json::Value> = rows
        .iter()
        .map(|row| {
            serde_json::json!({
                "page": row.page,
                "match": row.match_index,
                "current": is_current(row.kind),
                "fill": row.kind.fill(),
                "top": row.rect.top,
                "left": row.rect.left,
                "width": row.rect.width,
                "height": row.rect.height,
            })
        })
        .collect();
    let obj = serde_json::json!({
        "query": query,
        "status": status.to_string(),
        "current": current,
        "total": total,
        "highlights": highlights,
    });
    println!("{}", to_json(&obj)?);
    Ok(())
}

fn write_csv(rows: &[Row]) {
    println!("page,match,current,top,left,width,height");
    for row in rows {
        println!(
            "{},{},{},{:.2},{:.2},{:.2},{:.2}",
            row.page,
            row.match_index,
            is_current(row.kind),
            row.rect.top,
            row.rect.left,
            row.rect.width,
            row.rect.height,
        );
    }
}
