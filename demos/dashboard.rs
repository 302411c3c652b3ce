// Dashboard example: a segment → brand tree and a dealer grid, rendered to stdout.
use ratatui::layout::Rect;
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Cell, StatefulWidget};

use tui_tablegrid::prelude::*;
use tui_tablegrid::tree::ColumnSizing;
use tui_tablegrid::{format_currency, format_integer, format_percent};

// Metrics carried by every tree row.
#[derive(Clone, Copy)]
struct SegmentMetrics {
    units: f64,
    revenue: f64,
    margin: f64,
    yoy_growth: f64,
}

const fn metrics(units: f64, revenue: f64, margin: f64, yoy_growth: f64) -> SegmentMetrics {
    SegmentMetrics {
        units,
        revenue,
        margin,
        yoy_growth,
    }
}

fn segment(
    id: &str,
    name: &str,
    totals: SegmentMetrics,
    brands: &[(&str, &str, SegmentMetrics)],
) -> HierarchicalRow<SegmentMetrics> {
    brands.iter().fold(
        HierarchicalRow::root(id, name, totals),
        |row, &(brand_id, brand, metrics)| {
            row.with_child(HierarchicalRow::root(brand_id, brand, metrics))
        },
    )
}

fn segments() -> Vec<HierarchicalRow<SegmentMetrics>> {
    vec![
        segment(
            "tt",
            "Travel Trailers",
            metrics(52_400.0, 4.1e9, 18.2, 8.7),
            &[
                ("tt-jayco", "Jayco", metrics(18_200.0, 1.45e9, 19.1, 10.2)),
                ("tt-keystone", "Keystone", metrics(22_100.0, 1.62e9, 17.8, 7.4)),
                ("tt-heartland", "Heartland", metrics(12_100.0, 1.03e9, 17.5, 8.1)),
            ],
        ),
        segment(
            "fw",
            "Fifth Wheels",
            metrics(28_400.0, 2.8e9, 16.5, 6.2),
            &[
                ("fw-keystone", "Keystone", metrics(16_800.0, 1.68e9, 16.8, 5.8)),
                ("fw-heartland", "Heartland", metrics(11_600.0, 1.12e9, 16.1, 6.8)),
            ],
        ),
        segment(
            "mh",
            "Motorhomes",
            metrics(12_850.0, 2.1e9, 14.2, 4.8),
            &[("mh-tmc", "Thor Motor Coach", metrics(12_850.0, 2.1e9, 14.2, 4.8))],
        ),
    ]
}

fn units_cell(row: &HierarchicalRow<SegmentMetrics>) -> Cell<'_> {
    Cell::from(format_integer(row.payload.units))
}

fn revenue_cell(row: &HierarchicalRow<SegmentMetrics>) -> Cell<'_> {
    Cell::from(format_currency(row.payload.revenue))
}

fn margin_cell(row: &HierarchicalRow<SegmentMetrics>) -> Cell<'_> {
    Cell::from(format_percent(row.payload.margin, 1))
}

fn growth_cell(row: &HierarchicalRow<SegmentMetrics>) -> Cell<'_> {
    let trend = Trend::new(row.payload.yoy_growth, TrendDirection::UpIsGood);
    Cell::from(Line::from(trend.span(
        Style::default().fg(Color::Green),
        Style::default().fg(Color::Red),
    )))
}

// One row of the dealer grid.
struct Dealer {
    name: &'static str,
    brand: &'static str,
    region: &'static str,
    units: u32,
    revenue: f64,
}

const fn dealer(
    name: &'static str,
    brand: &'static str,
    region: &'static str,
    units: u32,
    revenue: f64,
) -> Dealer {
    Dealer {
        name,
        brand,
        region,
        units,
        revenue,
    }
}

fn dealers() -> Vec<Dealer> {
    vec![
        dealer("Lazydays RV", "Airstream", "Southeast", 1642, 187.4e6),
        dealer("Camping World - Denver", "Keystone", "West", 1384, 156.8e6),
        dealer("General RV Center", "Jayco", "Midwest", 1248, 142.1e6),
        dealer("Fun Town RV", "Keystone", "Southwest", 1127, 128.6e6),
        dealer("ExploreUSA RV", "Thor Motor Coach", "Southwest", 1036, 118.2e6),
        dealer("Motor Home Specialist", "Thor Motor Coach", "Southwest", 412, 94.7e6),
        dealer("Byerly RV", "Airstream", "Midwest", 987, 89.3e6),
        dealer("Colonial Airstream", "Airstream", "Northeast", 834, 86.2e6),
        dealer("Crestview RV", "Heartland", "Southeast", 921, 78.4e6),
        dealer("Bill Plemmons RV", "Jayco", "Southeast", 876, 74.8e6),
        dealer("Windish RV", "Keystone", "West", 812, 71.2e6),
        dealer("Bish's RV", "Heartland", "West", 798, 68.9e6),
    ]
}

fn dealer_name(row: &Dealer) -> CellValue<'_> {
    row.name.into()
}

fn brand(row: &Dealer) -> CellValue<'_> {
    row.brand.into()
}

fn region(row: &Dealer) -> CellValue<'_> {
    row.region.into()
}

fn units(row: &Dealer) -> CellValue<'_> {
    row.units.into()
}

fn units_label(row: &Dealer) -> String {
    format_integer(f64::from(row.units))
}

fn revenue(row: &Dealer) -> CellValue<'_> {
    row.revenue.into()
}

fn revenue_label(row: &Dealer) -> String {
    format_currency(row.revenue)
}

fn dealer_columns() -> Vec<GridColumn<Dealer>> {
    vec![
        GridColumn::new("dealer", "Dealer", dealer_name).width(ColumnWidth::new(12, 22, 28)),
        GridColumn::new("brand", "Brand", brand),
        GridColumn::new("region", "Region", region).sortable(false),
        GridColumn::numeric("units", "Units", units)
            .render(units_label)
            .width(ColumnWidth::fixed(9)),
        GridColumn::numeric("revenue", "Revenue", revenue)
            .render(revenue_label)
            .width(ColumnWidth::fixed(11)),
    ]
}

fn print(buffer: &Buffer) {
    let width = usize::from(buffer.area.width);
    for line in buffer.content().chunks(width) {
        let text: String = line.iter().map(ratatui::buffer::Cell::symbol).collect();
        println!("{}", text.trim_end());
    }
}

fn main() -> Result<(), GridError> {
    // Tree: expand one segment, then select a brand inside another.
    let mut tree = TreeTable::new(segments());
    tree.toggle("tt");
    tree.select_by_id("fw-heartland");

    let columns = PayloadColumns::new("Segment", ColumnWidth::new(18, 22, 26))
        .column(TreeColumn::new("Units", ColumnWidth::new(7, 8, 10), units_cell))
        .column(TreeColumn::new("Revenue", ColumnWidth::new(7, 9, 10), revenue_cell))
        .column(TreeColumn::new("Margin", ColumnWidth::new(6, 7, 8), margin_cell))
        .column(TreeColumn::new("YoY", ColumnWidth::new(7, 8, 9), growth_cell))
        .sizing(ColumnSizing::Adaptive);
    let style = TableStyle {
        title: Some(Line::from(format!(" Segments · {} ", tree.toggle_all_label()))),
        ..TableStyle::default()
    };

    let area = Rect::new(0, 0, 80, 12);
    let mut buffer = Buffer::empty(area);
    TreeTableView::new(&NameLabel, &columns, style).render(area, &mut buffer, &mut tree);
    print(&buffer);

    // Grid: search, sort by revenue descending, highlight one brand.
    let mut grid = GridTable::with_config(dealers(), dealer_columns(), GridConfig::new().page_size(5))?;
    grid.handle_action::<()>(TableAction::SetSearch("rv".into()));
    grid.toggle_sort("revenue");
    grid.toggle_sort("revenue");
    grid.set_highlight("brand", ["Keystone"]);
    grid.next_page();
    grid.select_first();

    let style = TableStyle {
        title: Some(Line::from(" Top Dealers ")),
        ..TableStyle::default()
    };
    let area = Rect::new(0, 0, 80, 9);
    let mut buffer = Buffer::empty(area);
    GridTableView::new(style).render(area, &mut buffer, &mut grid);
    print(&buffer);

    Ok(())
}
