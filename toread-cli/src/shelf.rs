use std::process::ExitCode;

use toread_lib::{
    Repository,
    repository::{Collection, Record},
};

const BOOKS_PER_SHELF: usize = 5;

pub fn handle(repo: &Repository) -> ExitCode {
    for line in render(&repo.collection()) {
        println!("{line}");
    }

    sysexits::ExitCode::Ok.into()
}

/// Lay the books out as spines, a few per shelf, each row followed by its plank.
fn render(collection: &Collection) -> Vec<String> {
    if collection.is_empty() {
        return vec!["The shelf is empty.".into()];
    }

    let books: Vec<&Record> = collection.iter().collect();

    books
        .chunks(BOOKS_PER_SHELF)
        .flat_map(|row| {
            let spines = row.iter().map(|r| spine(r)).collect::<Vec<_>>().join(" ");
            let plank = "=".repeat(spines.chars().count());
            [spines, plank]
        })
        .collect()
}

fn spine(record: &Record) -> String {
    let title = record.text().trim();

    if record.completed() {
        format!("|{title} ✓|")
    } else {
        format!("|{title}|")
    }
}
