use std::process::ExitCode;

use clap::Subcommand;
use colored::Colorize;
use toread_lib::{
    Repository,
    repository::{Collection, Durability, Record, Update},
};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List books
    List,
    /// Add a new book
    Add {
        /// The book title
        text: String,
        /// A cover image URL
        #[arg(short, long)]
        image: Option<String>,
    },
    /// Mark a book as read, or as unread again
    Toggle { id: u64 },
    /// Delete a book
    Delete { id: u64 },
}

pub fn handle(repo: &Repository, cmd: &Command) -> ExitCode {
    match cmd {
        Command::List => {
            print_list(&repo.collection());
            sysexits::ExitCode::Ok.into()
        }
        Command::Add { text, image } => {
            let update = repo.add(text, image.as_deref());
            if update.changed() {
                if let Some(record) = update.collection.last() {
                    println!("Added {}", line(record));
                }
            }
            report(update, "Nothing added, the title is blank")
        }
        Command::Toggle { id } => {
            let update = repo.toggle((*id).into());
            if update.changed() {
                if let Some(record) = update.collection.get((*id).into()) {
                    println!("{}", line(record));
                }
            }
            report(update, &format!("No book with id {id}"))
        }
        Command::Delete { id } => {
            let update = repo.delete((*id).into());
            if update.changed() {
                println!("Deleted {id}");
            }
            report(update, &format!("No book with id {id}"))
        }
    }
}

/// Turn the outcome of an intent into an exit code. Unchanged lists are not an error.
fn report(update: Update, unchanged: &str) -> ExitCode {
    match update.durability {
        Durability::Persisted => sysexits::ExitCode::Ok.into(),
        Durability::Unchanged => {
            eprintln!("{unchanged}");
            sysexits::ExitCode::Ok.into()
        }
        Durability::Failed(err) => {
            eprintln!(
                "{} the change was applied but could not be saved: {err}",
                "warning:".yellow().bold()
            );
            sysexits::ExitCode::IoErr.into()
        }
    }
}

fn print_list(collection: &Collection) {
    println!("Completed: {}", collection.completed_count());

    for record in collection {
        println!("{}", line(record));
    }
}

fn line(record: &Record) -> String {
    let (checkbox, title) = if record.completed() {
        ("[x]", record.text().strikethrough().dimmed())
    } else {
        ("[ ]", record.text().normal())
    };

    match record.image_url() {
        Some(url) => format!("{checkbox} {:>4}  {title} {}", record.id().get(), url.dimmed()),
        None => format!("{checkbox} {:>4}  {title}", record.id().get()),
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use toread_lib::repository::{
        IdSourceKind, MemoryStorage, Storage, StorageError, config::CoreConfig,
    };

    use super::*;

    /// Reads fine, refuses every write
    #[derive(Debug, Default)]
    struct ReadOnlyStorage {
        inner: MemoryStorage,
    }

    impl Storage for ReadOnlyStorage {
        fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.read(key)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("storage is disabled".into()))
        }
    }

    fn repo(storage: Arc<dyn Storage>) -> Repository {
        let mut cfg = CoreConfig::default();
        cfg.set_id_source(IdSourceKind::Sequential);
        Repository::open(&cfg, storage)
    }

    fn add(text: &str) -> Command {
        Command::Add {
            text: text.into(),
            image: None,
        }
    }

    fn ok() -> ExitCode {
        sysexits::ExitCode::Ok.into()
    }

    #[test]
    fn test_add() {
        let repo = repo(Arc::new(MemoryStorage::default()));

        assert_eq!(handle(&repo, &add("Dune")), ok());
        assert_eq!(repo.collection().last().unwrap().text(), "Dune");
    }

    #[test]
    fn test_add_blank_is_not_an_error() {
        let repo = repo(Arc::new(MemoryStorage::default()));

        assert_eq!(handle(&repo, &add("   ")), ok());
        assert!(repo.collection().is_empty());
    }

    #[test]
    fn test_unknown_id_is_not_an_error() {
        let repo = repo(Arc::new(MemoryStorage::default()));
        handle(&repo, &add("Dune"));

        assert_eq!(handle(&repo, &Command::Toggle { id: 99 }), ok());
        assert_eq!(handle(&repo, &Command::Delete { id: 99 }), ok());
        assert_eq!(repo.collection().len(), 1);
        assert!(!repo.collection().last().unwrap().completed());
    }

    #[test]
    fn test_toggle_and_delete() {
        let repo = repo(Arc::new(MemoryStorage::default()));
        handle(&repo, &add("Dune"));
        let id = repo.collection().last().unwrap().id().get();

        assert_eq!(handle(&repo, &Command::Toggle { id }), ok());
        assert!(repo.collection().last().unwrap().completed());

        assert_eq!(handle(&repo, &Command::Delete { id }), ok());
        assert!(repo.collection().is_empty());
    }

    #[test]
    fn test_unsaved_change_exits_with_io_error() {
        let repo = repo(Arc::new(ReadOnlyStorage::default()));

        let code = handle(&repo, &add("Dune"));

        assert_eq!(code, ExitCode::from(sysexits::ExitCode::IoErr));
        // The change still stands in memory
        assert_eq!(repo.collection().last().unwrap().text(), "Dune");
    }

    #[test]
    fn test_list() {
        let repo = repo(Arc::new(MemoryStorage::default()));

        assert_eq!(handle(&repo, &Command::List), ok());
    }
}
