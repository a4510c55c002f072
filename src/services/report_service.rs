//! Admin reports: one read query per kind, reshaped into a fixed table and
//! rendered into a paginated A4 PDF.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::reports::{Report, ReportKind, ReportTable},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    state::AppState,
};

pub const REVENUE_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, FromRow)]
pub struct SalesRow {
    pub order_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub item_count: i64,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct InventoryRow {
    pub name: String,
    pub hotel_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub category: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct RevenueRow {
    pub order_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub revenue: Decimal,
}

pub fn money(amount: Decimal) -> String {
    format!("KES {}", amount.normalize())
}

fn day(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

pub fn sales_table(rows: &[SalesRow]) -> ReportTable {
    let mut table = ReportTable::new(&["Order ID", "Customer", "Items", "Total Amount", "Date"]);
    for row in rows {
        table.push(vec![
            row.order_id.to_string(),
            format!("{} {}", row.first_name, row.last_name),
            row.item_count.to_string(),
            money(row.total_amount),
            day(&row.created_at),
        ]);
    }
    table
}

pub fn inventory_table(rows: &[InventoryRow]) -> ReportTable {
    let mut table = ReportTable::new(&["Product", "Hotel", "Quantity", "Price", "Category"]);
    for row in rows {
        table.push(vec![
            row.name.clone(),
            row.hotel_name.clone(),
            row.quantity.to_string(),
            money(row.price),
            row.category.clone(),
        ]);
    }
    table
}

/// One row per calendar day, newest first: number of orders and their item revenue.
pub fn revenue_table(rows: &[RevenueRow]) -> ReportTable {
    let mut days: BTreeMap<NaiveDate, (usize, Decimal)> = BTreeMap::new();
    for row in rows {
        let entry = days
            .entry(row.created_at.date_naive())
            .or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += row.revenue;
    }

    let mut table = ReportTable::new(&["Date", "Orders", "Total Revenue"]);
    for (date, (orders, revenue)) in days.into_iter().rev() {
        table.push(vec![
            date.format("%Y-%m-%d").to_string(),
            orders.to_string(),
            money(revenue),
        ]);
    }
    table
}

async fn fetch_table(state: &AppState, kind: ReportKind, now: DateTime<Utc>) -> AppResult<ReportTable> {
    let table = match kind {
        ReportKind::Sales => {
            let rows = sqlx::query_as::<_, SalesRow>(
                r#"
                SELECT o.id AS order_id, u.first_name, u.last_name,
                       o.total_amount, o.created_at, COUNT(oi.id) AS item_count
                FROM orders o
                JOIN users u ON u.id = o.user_id
                LEFT JOIN order_items oi ON oi.order_id = o.id
                GROUP BY o.id, u.first_name, u.last_name
                ORDER BY o.created_at DESC
                "#,
            )
            .fetch_all(&state.pool)
            .await?;
            sales_table(&rows)
        }
        ReportKind::Inventory => {
            let rows = sqlx::query_as::<_, InventoryRow>(
                r#"
                SELECT p.name, h.name AS hotel_name, p.quantity, p.price, p.category
                FROM products p
                JOIN hotels h ON h.id = p.hotel_id
                ORDER BY p.quantity ASC, p.name ASC
                "#,
            )
            .fetch_all(&state.pool)
            .await?;
            inventory_table(&rows)
        }
        ReportKind::Revenue => {
            let since = now - Duration::days(REVENUE_WINDOW_DAYS);
            let rows = sqlx::query_as::<_, RevenueRow>(
                r#"
                SELECT o.id AS order_id, o.created_at,
                       COALESCE(SUM(oi.quantity * oi.price), 0)::NUMERIC AS revenue
                FROM orders o
                LEFT JOIN order_items oi ON oi.order_id = o.id
                WHERE o.created_at >= $1
                GROUP BY o.id, o.created_at
                ORDER BY o.created_at DESC
                "#,
            )
            .bind(since)
            .fetch_all(&state.pool)
            .await?;
            revenue_table(&rows)
        }
    };
    Ok(table)
}

pub async fn build_report(state: &AppState, user: &AuthUser, kind: ReportKind) -> AppResult<Report> {
    ensure_admin(user)?;
    let now = Utc::now();
    let table = fetch_table(state, kind, now).await.map_err(|err| {
        tracing::error!(%kind, error = %err, "error generating report");
        AppError::Remote("Failed to generate report".into())
    })?;
    tracing::info!(%kind, rows = table.rows.len(), "report generated");
    Ok(Report::new(kind, now, table))
}

/// Split rows into pages: the first holds at most `first` rows, later ones
/// at most `rest`. An empty table still yields one (empty) page so the
/// document always has a header.
pub fn paginate(rows: &[Vec<String>], first: usize, rest: usize) -> Vec<&[Vec<String>]> {
    let split = first.max(1).min(rows.len());
    let (head, tail) = rows.split_at(split);
    let mut pages = vec![head];
    pages.extend(tail.chunks(rest.max(1)));
    pages
}

/// Relative width of each column, from the longest text it holds.
fn column_weights(table: &ReportTable) -> Vec<usize> {
    (0..table.headers.len())
        .map(|col| {
            let longest = table
                .rows
                .iter()
                .filter_map(|row| row.get(col))
                .chain(std::iter::once(&table.headers[col]))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(1);
            longest.clamp(4, 40)
        })
        .collect()
}

fn clip(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{kept}...")
}

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
/// Bottom limit for table rows, in mm. The page footer sits below it.
pub const MARGIN: f32 = 15.0;
const ROW_HEIGHT: f32 = 6.5;
const TITLE_GAP: f32 = 10.0;
const GENERATED_GAP: f32 = 12.0;
const TABLE_FONT: f32 = 7.5;
const CHAR_WIDTH: f32 = 1.45;

/// Baseline (mm from the bottom edge) of the table header on a page. The
/// first page starts lower to leave room for the title block.
pub fn header_baseline(first_page: bool) -> f32 {
    let top = PAGE_HEIGHT - MARGIN - 5.0;
    if first_page {
        top - TITLE_GAP - GENERATED_GAP
    } else {
        top
    }
}

/// Baselines of `rows` table rows drawn under the header of a page.
pub fn row_baselines(first_page: bool, rows: usize) -> Vec<f32> {
    let mut y = header_baseline(first_page);
    (0..rows)
        .map(|_| {
            y -= ROW_HEIGHT;
            y
        })
        .collect()
}

/// How many rows fit between the header and the bottom margin.
pub fn rows_per_page(first_page: bool) -> usize {
    let mut y = header_baseline(first_page) - ROW_HEIGHT;
    let mut count = 0;
    while y >= MARGIN {
        count += 1;
        y -= ROW_HEIGHT;
    }
    count.max(1)
}

/// Baseline of the "Page n of m" footer.
pub fn footer_baseline() -> f32 {
    MARGIN - 5.0
}

/// The report rows split the way [`render_pdf`] lays them out.
pub fn report_pages(table: &ReportTable) -> Vec<&[Vec<String>]> {
    paginate(&table.rows, rows_per_page(true), rows_per_page(false))
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
}

fn text(layer: &PdfLayerReference, value: &str, size: f32, x: f32, y: f32, font: &IndirectFontRef) {
    layer.use_text(value, size.into(), Mm(x.into()), Mm(y.into()), font);
}

fn pdf_error(err: printpdf::Error) -> AppError {
    AppError::Internal(anyhow::anyhow!("pdf rendering failed: {err}"))
}

pub fn render_pdf(report: &Report) -> AppResult<Vec<u8>> {
    let (doc, first_page_index, first_layer) = PdfDocument::new(
        report.title.as_str(),
        Mm(PAGE_WIDTH.into()),
        Mm(PAGE_HEIGHT.into()),
        "Layer 1",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_error)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_error)?,
    };

    let table = &report.table;
    let weights = column_weights(table);
    let weight_sum: usize = weights.iter().sum::<usize>().max(1);
    let usable = PAGE_WIDTH - 2.0 * MARGIN;
    let mut columns: Vec<(f32, usize)> = Vec::with_capacity(weights.len());
    let mut x = MARGIN;
    for weight in &weights {
        let width = usable * (*weight as f32) / (weight_sum as f32);
        columns.push((x, ((width / CHAR_WIDTH) as usize).max(4)));
        x += width;
    }

    let pages = report_pages(table);
    let page_count = pages.len();
    for (index, rows) in pages.into_iter().enumerate() {
        let first_page = index == 0;
        let layer = if first_page {
            doc.get_page(first_page_index).get_layer(first_layer)
        } else {
            let (page, layer) = doc.add_page(
                Mm(PAGE_WIDTH.into()),
                Mm(PAGE_HEIGHT.into()),
                format!("Page {}", index + 1),
            );
            doc.get_page(page).get_layer(layer)
        };

        if first_page {
            let top = PAGE_HEIGHT - MARGIN - 5.0;
            text(&layer, &report.title, 20.0, MARGIN, top, &fonts.bold);
            let generated = format!("Generated on: {}", report.generated_at.format("%Y-%m-%d"));
            text(&layer, &generated, 12.0, MARGIN, top - TITLE_GAP, &fonts.regular);
        }

        let header_y = header_baseline(first_page);
        for (header, (col_x, max_chars)) in table.headers.iter().zip(&columns) {
            text(&layer, &clip(header, *max_chars), TABLE_FONT, *col_x, header_y, &fonts.bold);
        }

        for (row, y) in rows.iter().zip(row_baselines(first_page, rows.len())) {
            for (cell, (col_x, max_chars)) in row.iter().zip(&columns) {
                text(&layer, &clip(cell, *max_chars), TABLE_FONT, *col_x, y, &fonts.regular);
            }
        }

        let footer = format!("Page {} of {}", index + 1, page_count);
        text(&layer, &footer, 8.0, PAGE_WIDTH - MARGIN - 25.0, footer_baseline(), &fonts.regular);
    }

    doc.save_to_bytes().map_err(pdf_error)
}
