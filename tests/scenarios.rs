//! End-to-end scenarios driving both engines through their public API.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::widgets::{Cell, StatefulWidget};
use tui_tablegrid::prelude::*;
use tui_tablegrid::{format_currency, validate_forest};

fn visible(table: &TreeTable<()>) -> Vec<&str> {
    table.visible_rows().map(|row| row.row.id.as_str()).collect()
}

fn trailers() -> Vec<HierarchicalRow<()>> {
    vec![
        HierarchicalRow::root("tt", "Travel Trailers", ())
            .with_child(HierarchicalRow::root("tt-a", "Jayco", ()))
            .with_child(HierarchicalRow::root("tt-b", "Forest River", ())),
    ]
}

#[test]
fn tree_toggle_and_collapse_all() {
    let mut table = TreeTable::validated(trailers()).unwrap();
    assert_eq!(visible(&table), vec!["tt"]);

    table.toggle("tt");
    assert_eq!(visible(&table), vec!["tt", "tt-a", "tt-b"]);
    assert!(table.is_all_expanded());
    assert_eq!(table.toggle_all_label(), "Collapse All");

    table.collapse_all();
    assert_eq!(visible(&table), vec!["tt"]);
    assert_eq!(table.toggle_all_label(), "Expand All");
}

#[test]
fn tree_actions_mirror_direct_calls() {
    let mut table = TreeTable::new(trailers());
    assert_eq!(
        table.handle_action::<()>(TableAction::ToggleNode("tt".into())),
        TableEvent::Handled
    );
    assert_eq!(table.visible_len(), 3);
    assert_eq!(
        table.handle_action::<()>(TableAction::ToggleAll),
        TableEvent::Handled
    );
    assert_eq!(visible(&table), vec!["tt"]);
    assert_eq!(
        table.handle_action::<()>(TableAction::ToggleNode("missing".into())),
        TableEvent::Unhandled
    );
}

#[test]
fn inconsistent_forest_is_rejected_up_front() {
    let mut forest = trailers();
    forest[0].children[1].level = 3;
    assert_eq!(
        validate_forest(&forest),
        Err(ForestError::LevelMismatch {
            id: "tt-b".into(),
            expected: 1,
            found: 3,
        })
    );

    let duplicate = vec![
        HierarchicalRow::root("tt", "Travel Trailers", ()),
        HierarchicalRow::root("tt", "Again", ()),
    ];
    assert!(matches!(
        TreeTable::validated(duplicate),
        Err(ForestError::DuplicateId(id)) if id == "tt"
    ));
}

#[derive(Debug)]
struct Model {
    name: &'static str,
    segment: &'static str,
    units: f64,
    revenue: f64,
}

fn name(row: &Model) -> CellValue<'_> {
    row.name.into()
}

fn segment(row: &Model) -> CellValue<'_> {
    row.segment.into()
}

fn units(row: &Model) -> CellValue<'_> {
    row.units.into()
}

fn revenue(row: &Model) -> CellValue<'_> {
    row.revenue.into()
}

fn revenue_label(row: &Model) -> String {
    format_currency(row.revenue)
}

fn models() -> Vec<Model> {
    vec![
        Model {
            name: "B",
            segment: "Towable",
            units: 3.0,
            revenue: 120_000.0,
        },
        Model {
            name: "A",
            segment: "Motorized",
            units: 5.0,
            revenue: 2_400_000.0,
        },
        Model {
            name: "C",
            segment: "Towable",
            units: 8.0,
            revenue: 950.0,
        },
    ]
}

fn model_columns() -> Vec<GridColumn<Model>> {
    vec![
        GridColumn::new("name", "Model", name),
        GridColumn::new("segment", "Segment", segment),
        GridColumn::numeric("units", "Units", units),
        GridColumn::numeric("revenue", "Revenue", revenue).render(revenue_label),
    ]
}

fn names(grid: &GridTable<Model>) -> Vec<&'static str> {
    grid.visible_rows().map(|row| row.name).collect()
}

#[test]
fn grid_filter_sort_page_order() {
    let mut grid = GridTable::new(models(), model_columns()).unwrap();
    grid.set_page_size(2);
    grid.toggle_sort("units");

    assert_eq!(names(&grid), vec!["B", "A"]);
    grid.set_page_index(1);
    assert_eq!(names(&grid), vec!["C"]);

    grid.toggle_sort("units");
    grid.toggle_sort("units");
    assert_eq!(grid.sort(), None);
    assert_eq!(grid.pagination().page_index, 0);
    assert_eq!(names(&grid), vec!["B", "A"]);
}

#[test]
fn grid_search_uses_rendered_text_of_visible_columns() {
    let mut grid = GridTable::new(models(), model_columns()).unwrap();

    grid.set_global_filter("$2.4m");
    assert_eq!(names(&grid), vec!["A"]);

    grid.set_global_filter("motor");
    assert_eq!(names(&grid), vec!["A"]);
    grid.set_column_visibility("segment", false);
    assert!(names(&grid).is_empty());
    assert_eq!(grid.summary().to_string(), "Showing 0 to 0 of 0 results");
}

#[test]
fn grid_page_size_change_clamps_page_index() {
    let rows = (0..25)
        .map(|idx| Model {
            name: "M",
            segment: "Towable",
            units: f64::from(idx),
            revenue: 0.0,
        })
        .collect();
    let mut grid = GridTable::new(rows, model_columns()).unwrap();
    grid.set_page_index(2);
    assert_eq!(grid.page_count(), 3);

    grid.set_page_size(100);

    assert_eq!(grid.page_count(), 1);
    assert_eq!(grid.pagination().page_index, 0);
}

#[test]
fn cross_filter_highlight_dims_other_rows() {
    let mut grid = GridTable::new(models(), model_columns()).unwrap();
    grid.set_highlight("segment", ["Towable"]);
    let emphasis: Vec<RowEmphasis> = grid.visible_rows().map(|row| grid.row_emphasis(row)).collect();
    assert_eq!(
        emphasis,
        vec![RowEmphasis::Active, RowEmphasis::Dimmed, RowEmphasis::Active]
    );
}

fn units_cell(row: &HierarchicalRow<u32>) -> Cell<'_> {
    Cell::from(row.payload.to_string())
}

fn text(buffer: &Buffer) -> String {
    buffer
        .content()
        .iter()
        .map(ratatui::buffer::Cell::symbol)
        .collect()
}

#[test]
fn both_views_render_into_a_buffer() {
    let forest = vec![
        HierarchicalRow::root("tt", "Travel Trailers", 52_400)
            .with_child(HierarchicalRow::root("tt-a", "Jayco", 18_200)),
    ];
    let mut tree = TreeTable::new(forest);
    tree.expand_all();
    let columns = PayloadColumns::new("Name", ColumnWidth::fixed(20))
        .column(TreeColumn::new("Units", ColumnWidth::fixed(8), units_cell));
    let area = Rect::new(0, 0, 40, 6);
    let mut buffer = Buffer::empty(area);
    TreeTableView::new(&NameLabel, &columns, TableStyle::default()).render(
        area,
        &mut buffer,
        &mut tree,
    );
    let rendered = text(&buffer);
    assert!(rendered.contains("Travel Trailers"));
    assert!(rendered.contains("18200"));

    let mut grid = GridTable::new(models(), model_columns()).unwrap();
    let area = Rect::new(0, 0, 70, 8);
    let mut buffer = Buffer::empty(area);
    GridTableView::new(TableStyle::default()).render(area, &mut buffer, &mut grid);
    let rendered = text(&buffer);
    assert!(rendered.contains("$2.4M"));
    assert!(rendered.contains("Showing 1 to 3 of 3 results"));
}

#[cfg(feature = "keymap")]
#[test]
fn keys_drive_both_tables() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    let key = |code| KeyEvent::new(code, KeyModifiers::NONE);

    let mut tree = TreeTable::new(trailers());
    assert_eq!(tree.handle_key(key(KeyCode::Down)), TableEvent::Handled);
    assert_eq!(tree.handle_key(key(KeyCode::Enter)), TableEvent::Handled);
    assert_eq!(visible(&tree), vec!["tt", "tt-a", "tt-b"]);

    let mut grid = GridTable::new(models(), model_columns()).unwrap();
    grid.handle_key(key(KeyCode::Right));
    grid.handle_key(key(KeyCode::Right));
    grid.handle_key(key(KeyCode::Right));
    assert_eq!(grid.handle_key(key(KeyCode::Enter)), TableEvent::Handled);
    assert_eq!(grid.sort_direction("units"), Some(SortDirection::Ascending));
}

#[cfg(feature = "serde")]
#[test]
fn snapshots_survive_json() {
    let mut tree = TreeTable::new(trailers());
    tree.toggle("tt");
    tree.select_by_id("tt-b");
    let json = serde_json::to_string(&tree.snapshot()).unwrap();
    let snapshot: TreeTableSnapshot = serde_json::from_str(&json).unwrap();
    let mut restored = TreeTable::new(trailers());
    restored.restore(snapshot);
    assert_eq!(restored.selected_id(), Some("tt-b"));

    let mut grid = GridTable::new(models(), model_columns()).unwrap();
    grid.toggle_sort("revenue");
    grid.set_global_filter("towable");
    let json = serde_json::to_string(&grid.snapshot()).unwrap();
    let snapshot: GridTableSnapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snapshot, grid.snapshot());

    let config: GridConfig = serde_json::from_str(r#"{"page_size": 20}"#).unwrap();
    assert_eq!(config.page_size, 20);
    assert!(config.paginated);
}
