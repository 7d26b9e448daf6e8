// Example: 10k rows rendered as text lines, sorted, filtered and scrolled.
use std::sync::Arc;

use infinitable::{Anchor, CellHost, Record, SortSpec, Table, TableOptions, Value};

struct Row {
    id: i64,
    value: f64,
    string: String,
}

impl Record for Row {
    type Id = i64;

    fn id(&self) -> i64 {
        self.id
    }

    fn field(&self, column: &str) -> Option<Value<'_>> {
        match column {
            "id" => Some(Value::Int(self.id)),
            "value" => Some(Value::Float(self.value)),
            "string" => Some(Value::Str(&self.string)),
            _ => None,
        }
    }
}

/// Keeps rendered lines in display order.
#[derive(Default)]
struct TextHost {
    lines: Vec<(usize, String)>,
    spacers: (u64, u64),
}

impl CellHost<Row> for TextHost {
    type Cell = String;

    fn render(&mut self, item: &Arc<Row>, index: usize) -> String {
        format!("{index:>5} | {:>5} | {:.6} | {}", item.id, item.value, item.string)
    }

    fn attach(&mut self, index: usize, cell: &String, after: Anchor<'_, String>) {
        let at = match after {
            Anchor::Leading => 0,
            Anchor::After { index: prev, .. } => self
                .lines
                .iter()
                .position(|(i, _)| *i == prev)
                .map_or(self.lines.len(), |p| p + 1),
        };
        self.lines.insert(at, (index, cell.clone()));
    }

    fn detach(&mut self, index: usize, _cell: String) {
        self.lines.retain(|(i, _)| *i != index);
    }

    fn set_spacers(&mut self, before: u64, after: u64) {
        self.spacers = (before, after);
    }
}

fn print_window(label: &str, table: &Table<Row, TextHost>) {
    let host = table.host();
    println!("-- {label}: window={:?} spacers={:?}", table.window(), host.spacers);
    for (_, line) in host.lines.iter().take(5) {
        println!("{line}");
    }
    println!("   ... {} live cells", host.lines.len());
}

fn make_rows(n: i64) -> Vec<Row> {
    const CHARS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    let mut seed = 0x2545_f491_4f6c_dd1du64;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    (0..n)
        .map(|id| {
            let value = (next() % 1_000_000) as f64 / 1_000_000.0;
            let string = (0..20)
                .map(|_| CHARS[(next() % CHARS.len() as u64) as usize] as char)
                .collect();
            Row { id, value, string }
        })
        .collect()
}

fn main() -> Result<(), infinitable::Error> {
    let options = TableOptions::new(50)
        .with_sort(SortSpec::by("id"))
        .with_viewport_size(600);
    let mut table = Table::new(options, make_rows(10_000), TextHost::default())?;
    print_window("initial", &table);

    let stats = table.apply_scroll_offset(5_000);
    println!("scroll to 5000: {stats:?}");
    print_window("scrolled", &table);

    let stats = table.sort(SortSpec::by("value").descending())?;
    println!("sort by value desc: {stats:?}");
    print_window("sorted", &table);

    let stats = table.filter(Some("string"), Some("ab"))?;
    println!("filter string~'ab': {stats:?}, {} rows", table.len());
    print_window("filtered", &table);

    let host = table.destroy();
    println!("destroyed: {} live cells", host.lines.len());
    Ok(())
}
