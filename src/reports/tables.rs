use super::bars::{format_value, progress_bar};
use super::{placeholder, print_placeholder};
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use keystats::client::{Dataset, FetchState};
use keystats::models::{Corpus, Id, Keyboard, Layout, LayoutPreview, Metric, MetricField};
use keystats::pipeline::{compute_hand_percents, ComparisonRow, DiffTone, MetricRange};
use keystats::selection::{corpora as available_corpora, Selection, Side};
use std::collections::BTreeMap;
use strum::IntoEnumIterator;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn right_align_from(table: &mut Table, first: usize, last: usize) {
    for i in first..=last {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

fn opt_num<T: ToString>(v: Option<T>) -> String {
    v.map(|x| x.to_string()).unwrap_or_else(|| "—".to_string())
}

pub fn corpora(state: &FetchState<Vec<Corpus>>) {
    let Some(items) = state.data() else {
        print_placeholder(state);
        return;
    };

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Corpus").add_attribute(Attribute::Bold),
        Cell::new("Language"),
        Cell::new("Symbols"),
        Cell::new("Size"),
        Cell::new("Description"),
    ]);
    right_align_from(&mut table, 3, 4);

    for c in items {
        table.add_row(vec![
            Cell::new(c.id),
            Cell::new(&c.name).add_attribute(Attribute::Bold),
            Cell::new(&c.language),
            Cell::new(opt_num(c.unique_symbols)),
            Cell::new(opt_num(c.size)),
            Cell::new(&c.description),
        ]);
    }
    println!("\n{}", table);
}

pub fn keyboards(state: &FetchState<Vec<Keyboard>>) {
    let Some(items) = state.data() else {
        print_placeholder(state);
        return;
    };

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Keyboard").add_attribute(Attribute::Bold),
        Cell::new("Form factor"),
        Cell::new("Keys"),
        Cell::new("Rows"),
    ]);
    right_align_from(&mut table, 3, 4);

    for k in items {
        table.add_row(vec![
            Cell::new(k.id),
            Cell::new(&k.name).add_attribute(Attribute::Bold),
            Cell::new(&k.form_factor),
            Cell::new(opt_num(k.keys)),
            Cell::new(opt_num(k.rows)),
        ]);
    }
    println!("\n{}", table);
}

pub fn layouts(state: &FetchState<Vec<Layout>>, previews: &[LayoutPreview]) {
    let Some(items) = state.data() else {
        print_placeholder(state);
        return;
    };

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("ID").add_attribute(Attribute::Bold),
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Language"),
        Cell::new("Previews"),
        Cell::new("Description"),
    ]);
    right_align_from(&mut table, 3, 3);

    for l in items {
        let preview_count = previews.iter().filter(|p| p.layout == l.id).count();
        table.add_row(vec![
            Cell::new(l.id),
            Cell::new(&l.name).add_attribute(Attribute::Bold),
            Cell::new(&l.language),
            Cell::new(preview_count),
            Cell::new(&l.description),
        ]);
    }
    println!("\n{}", table);
}

/// Filtered metric list; every cell carries a bar scaled to the dataset range.
pub fn metrics(rows: &[&Metric], fields: &[MetricField], ranges: &BTreeMap<MetricField, MetricRange>) {
    if rows.is_empty() {
        println!("No metrics match the current filter.");
        return;
    }

    let mut table = new_table();
    let mut header = vec![
        Cell::new("Layout").add_attribute(Attribute::Bold),
        Cell::new("Keyboard"),
        Cell::new("Corpus"),
        Cell::new("L% | R%").fg(Color::Cyan),
    ];
    header.extend(fields.iter().map(|f| Cell::new(f.label())));
    table.add_row(header);
    right_align_from(&mut table, 3, 3 + fields.len());

    for m in rows {
        let hands = compute_hand_percents(&m.finger_usages());
        let mut cells = vec![
            Cell::new(m.display_name()).add_attribute(Attribute::Bold),
            Cell::new(&m.keyboard_name),
            Cell::new(&m.corpus_name),
            Cell::new(format!("{:.1} | {:.1}", hands.left, hands.right)).fg(Color::Cyan),
        ];
        for &field in fields {
            let value = m.value(field);
            let bar = match value {
                Some(v) => progress_bar(ranges.get(&field).copied().unwrap_or_default().fraction(v)),
                None => String::new(),
            };
            cells.push(Cell::new(format!("{}\n{}", format_value(field, value), bar)));
        }
        table.add_row(cells);
    }
    println!("\n{}", table);
}

fn tone_color(tone: DiffTone) -> Option<Color> {
    match tone {
        DiffTone::Better => Some(Color::Green),
        DiffTone::Worse => Some(Color::Red),
        DiffTone::Neutral => None,
    }
}

fn panel_title(m: &Metric) -> String {
    format!("{}\n{} · {}", m.display_name(), m.keyboard_name, m.corpus_name)
}

pub fn comparison(reference: &Metric, current: &Metric, rows: &[ComparisonRow]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new(panel_title(reference)),
        Cell::new(panel_title(current)).add_attribute(Attribute::Bold),
        Cell::new("Δ").add_attribute(Attribute::Bold),
    ]);
    right_align_from(&mut table, 1, 3);

    let mut last_group = None;
    for row in rows {
        let group = row.field.group();
        if last_group != Some(group) {
            table.add_row(vec![Cell::new(group.to_string()).fg(Color::Cyan)]);
            last_group = Some(group);
        }

        let delta_cell = match &row.diff {
            Some(diff) => {
                let cell = Cell::new(diff.display());
                match tone_color(diff.tone()) {
                    Some(color) => cell.fg(color),
                    None => cell,
                }
            }
            None => Cell::new("—"),
        };

        table.add_row(vec![
            Cell::new(row.field.label()),
            Cell::new(format_value(row.field, row.reference)),
            Cell::new(format_value(row.field, row.current)),
            delta_cell,
        ]);
    }
    println!("\n{}", table);
}

pub fn hand_balance(metrics: &[&Metric]) {
    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Hand balance").add_attribute(Attribute::Bold),
        Cell::new("Left %"),
        Cell::new("Right %"),
    ]);
    right_align_from(&mut table, 1, 2);

    for m in metrics {
        let hands = compute_hand_percents(&m.finger_usages());
        table.add_row(vec![
            Cell::new(m.display_name()).add_attribute(Attribute::Bold),
            Cell::new(format!("{:.1}", hands.left)),
            Cell::new(format!("{:.1}", hands.right)),
        ]);
    }
    println!("\n{}", table);
}

/// Lists what the next empty dropdown of a panel can be set to.
pub fn selection_options(side: Side, sel: &Selection, dataset: &Dataset) {
    let metrics = dataset.metrics();
    let (level, options): (&str, Vec<(Id, Option<&str>)>) = if sel.corpus.is_none() {
        let options = match dataset.corpora.data() {
            Some(items) => items.iter().map(|c| (c.id, Some(c.name.as_str()))).collect(),
            None => available_corpora(metrics).into_iter().map(|id| (id, None)).collect(),
        };
        ("corpus", options)
    } else if sel.keyboard.is_none() {
        let ids = sel.keyboard_options(metrics);
        ("keyboard", ids.into_iter().map(|id| (id, dataset.keyboard_name(id))).collect())
    } else {
        let ids = sel.layout_options(metrics);
        ("layout", ids.into_iter().map(|id| (id, dataset.layout_name(id))).collect())
    };

    if options.is_empty() {
        println!("{} panel: no {} options available.", side, level);
        return;
    }

    let mut table = new_table();
    table.add_row(vec![
        Cell::new(format!("{} panel: choose a {}", side, level)).add_attribute(Attribute::Bold),
        Cell::new("ID"),
    ]);
    right_align_from(&mut table, 1, 1);
    for (id, name) in options {
        table.add_row(vec![Cell::new(name.unwrap_or("(unnamed)")), Cell::new(id)]);
    }
    println!("\n{}", table);
}

pub fn metric_detail(m: &Metric, keyboard: &FetchState<Keyboard>, layout: &FetchState<Layout>) {
    println!("\n📊 {} (metric #{})", m.display_name(), m.id);
    let keyboard = match keyboard.data() {
        Some(k) => format!("{} [{}]", k.name, k.form_factor),
        None => placeholder(keyboard),
    };
    let layout = match layout.data() {
        Some(l) => format!("{} ({})", l.name, l.language),
        None => placeholder(layout),
    };
    println!("   Keyboard: {}", keyboard);
    println!("   Layout:   {}", layout);
    println!("   Corpus:   {}", m.corpus_name);

    let mut table = new_table();
    table.add_row(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value"),
    ]);
    right_align_from(&mut table, 1, 1);

    let mut last_group = None;
    for field in MetricField::iter() {
        let group = field.group();
        if last_group != Some(group) {
            table.add_row(vec![Cell::new(group.to_string()).fg(Color::Cyan)]);
            last_group = Some(group);
        }
        table.add_row(vec![
            Cell::new(field.label()),
            Cell::new(format_value(field, m.value(field))),
        ]);
    }

    let hands = compute_hand_percents(&m.finger_usages());
    table.add_row(vec![
        Cell::new("Hand balance (L | R)").add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}% | {:.1}%", hands.left, hands.right)),
    ]);
    println!("{}", table);
}
