use chrono::{TimeZone, Utc};
use hotel_storefront::{
    dto::reports::{Report, ReportKind, ReportTable},
    services::report_service::{
        InventoryRow, MARGIN, RevenueRow, SalesRow, footer_baseline, header_baseline,
        inventory_table, money, paginate, render_pdf, report_pages, revenue_table, row_baselines,
        rows_per_page, sales_table,
    },
};
use rust_decimal::Decimal;
use uuid::Uuid;

fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).single().expect("valid date")
}

#[test]
fn sales_rows_name_the_customer() {
    let order_id = Uuid::new_v4();
    let table = sales_table(&[SalesRow {
        order_id,
        first_name: "Jane".to_string(),
        last_name: "Wanjiru".to_string(),
        item_count: 3,
        total_amount: Decimal::new(7500000, 2),
        created_at: at(4, 9),
    }]);

    assert_eq!(
        table.headers,
        vec!["Order ID", "Customer", "Items", "Total Amount", "Date"]
    );
    assert_eq!(
        table.rows[0],
        vec![
            order_id.to_string(),
            "Jane Wanjiru".to_string(),
            "3".to_string(),
            "KES 75000".to_string(),
            "2024-03-04".to_string(),
        ]
    );
}

#[test]
fn inventory_rows_keep_query_order() {
    let rows = [
        InventoryRow {
            name: "Spa Massage".to_string(),
            hotel_name: "Sankara Nairobi".to_string(),
            quantity: 2,
            price: Decimal::new(600000, 2),
            category: "service".to_string(),
        },
        InventoryRow {
            name: "Deluxe King Room".to_string(),
            hotel_name: "Serena Hotel Nairobi".to_string(),
            quantity: 12,
            price: Decimal::new(2500050, 2),
            category: "room".to_string(),
        },
    ];
    let table = inventory_table(&rows);
    assert_eq!(table.headers, vec!["Product", "Hotel", "Quantity", "Price", "Category"]);
    assert_eq!(table.rows[0][0], "Spa Massage");
    assert_eq!(table.rows[1][3], "KES 25000.5");
}

#[test]
fn revenue_is_grouped_per_day_newest_first() {
    let rows = [
        RevenueRow { order_id: Uuid::new_v4(), created_at: at(5, 18), revenue: Decimal::from(1000) },
        RevenueRow { order_id: Uuid::new_v4(), created_at: at(5, 8), revenue: Decimal::from(2500) },
        RevenueRow { order_id: Uuid::new_v4(), created_at: at(2, 12), revenue: Decimal::ZERO },
        RevenueRow { order_id: Uuid::new_v4(), created_at: at(3, 23), revenue: Decimal::from(400) },
    ];
    let table = revenue_table(&rows);

    assert_eq!(table.headers, vec!["Date", "Orders", "Total Revenue"]);
    assert_eq!(
        table.rows,
        vec![
            vec!["2024-03-05".to_string(), "2".to_string(), "KES 3500".to_string()],
            vec!["2024-03-03".to_string(), "1".to_string(), "KES 400".to_string()],
            vec!["2024-03-02".to_string(), "1".to_string(), "KES 0".to_string()],
        ]
    );
}

#[test]
fn money_drops_trailing_zeros() {
    assert_eq!(money(Decimal::new(2500000, 2)), "KES 25000");
    assert_eq!(money(Decimal::new(1999, 2)), "KES 19.99");
}

#[test]
fn pagination_covers_every_row_once() {
    let rows: Vec<Vec<String>> = (0..95).map(|i| vec![i.to_string()]).collect();
    let pages = paginate(&rows, 30, 40);
    assert_eq!(pages.iter().map(|page| page.len()).collect::<Vec<_>>(), vec![30, 40, 25]);

    let flattened: Vec<&Vec<String>> = pages.iter().flat_map(|page| page.iter()).collect();
    assert_eq!(flattened.len(), rows.len());
    assert!(flattened.iter().zip(rows.iter()).all(|(a, b)| *a == b));

    let empty: Vec<Vec<String>> = Vec::new();
    let pages = paginate(&empty, 30, 40);
    assert_eq!(pages.len(), 1);
    assert!(pages[0].is_empty());
}

#[test]
fn report_filename_uses_kind_and_date() {
    let report = Report::new(ReportKind::Revenue, at(7, 10), ReportTable::default());
    assert_eq!(report.title, "Revenue Report");
    assert_eq!(report.filename("pdf"), "revenue-report-2024-03-07.pdf");
    assert!("weekly".parse::<ReportKind>().is_err());
    assert_eq!("sales".parse::<ReportKind>().expect("kind"), ReportKind::Sales);
}

#[test]
fn rendered_report_is_a_pdf() {
    let mut table = ReportTable::new(&["Product", "Hotel", "Quantity", "Price", "Category"]);
    for i in 0..(rows_per_page(false) * 2 + 3) {
        table.push(vec![
            format!("Item {i}"),
            "Villa Rosa Kempinski".to_string(),
            i.to_string(),
            money(Decimal::from(i as i64 * 100)),
            "food".to_string(),
        ]);
    }
    let report = Report::new(ReportKind::Inventory, at(1, 0), table);

    let bytes = render_pdf(&report).expect("rendered");
    assert!(bytes.starts_with(b"%PDF"));

    let empty = Report::new(ReportKind::Sales, at(1, 0), ReportTable::new(&["Order ID"]));
    assert!(render_pdf(&empty).expect("rendered").starts_with(b"%PDF"));
}

fn inventory_rows(count: usize) -> ReportTable {
    let mut table = ReportTable::new(&["Product", "Hotel", "Quantity", "Price", "Category"]);
    for i in 0..count {
        table.push(vec![
            format!("Item {i}"),
            "Tribe Hotel".to_string(),
            i.to_string(),
            money(Decimal::from(i as i64)),
            "service".to_string(),
        ]);
    }
    table
}

#[test]
fn every_row_stays_above_the_bottom_margin() {
    let table = inventory_rows(120);
    let pages = report_pages(&table);

    assert!(rows_per_page(true) < rows_per_page(false));
    assert_eq!(pages.iter().map(|page| page.len()).sum::<usize>(), 120);

    for (index, rows) in pages.iter().enumerate() {
        let first_page = index == 0;
        assert!(rows.len() <= rows_per_page(first_page));
        let baselines = row_baselines(first_page, rows.len());
        assert!(baselines.iter().all(|y| *y >= MARGIN), "page {} overflows", index + 1);
        assert!(baselines.iter().all(|y| *y < header_baseline(first_page)));
    }
    assert!(footer_baseline() < MARGIN);
}

#[test]
fn first_page_leaves_room_for_the_title() {
    let table = inventory_rows(38);
    let pages = report_pages(&table);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].len(), rows_per_page(true));

    let last = row_baselines(true, pages[0].len());
    assert!(last.last().is_some_and(|y| *y >= MARGIN));
}
