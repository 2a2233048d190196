//! Line-oriented admin shell over one resource page.

use curator_application::{
    ListSnapshot, MutationController, ResourcePage, SubmitOutcome, TableView,
};
use curator_core::{AppError, AppResult};
use curator_domain::{FilterKey, MutationDraft, RecordId, ResourceBinding};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
commands:
  list                     reload the current page
  search <text>            free-text search (empty clears)
  status <value|->         status filter
  scope <id|->             parent id for nested resources
  filter <key> <value|->   resource-specific filter
  page <n> | size <n>      pagination
  new | edit <id>          open the add or edit form
  set <field> <value>      write a text field
  flag <field> <on|off>    write a flag field
  save | cancel            submit or discard the open form
  toggle <id>              flip the row status
  delete <id>              ask to delete a row
  confirm | abort          answer the pending delete
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Filter(FilterKey, String),
    Page(u32),
    New,
    Edit(RecordId),
    Set(String, String),
    Flag(String, bool),
    Save,
    Cancel,
    Toggle(RecordId),
    Delete(RecordId),
    Confirm,
    Abort,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line; blank lines yield `None`.
    pub fn parse(line: &str) -> AppResult<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match verb {
            "list" | "ls" => Self::List,
            "search" => Self::Filter(FilterKey::Search, rest.to_owned()),
            "status" => Self::Filter(FilterKey::Status, clearable(rest)),
            "scope" => Self::Filter(FilterKey::Scope, clearable(rest)),
            "size" => Self::Filter(FilterKey::PageSize, rest.to_owned()),
            "filter" => {
                let (key, value) = split_argument(verb, rest)?;
                Self::Filter(FilterKey::parse(key), clearable(value))
            }
            "page" => Self::Page(parse_page(rest)?),
            "new" => Self::New,
            "edit" => Self::Edit(record_id(verb, rest)?),
            "set" => {
                let (field, value) = split_argument(verb, rest)?;
                Self::Set(field.to_owned(), value.to_owned())
            }
            "flag" => {
                let (field, value) = split_argument(verb, rest)?;
                Self::Flag(field.to_owned(), parse_flag(value)?)
            }
            "save" => Self::Save,
            "cancel" => Self::Cancel,
            "toggle" => Self::Toggle(record_id(verb, rest)?),
            "delete" | "rm" => Self::Delete(record_id(verb, rest)?),
            "confirm" | "yes" => Self::Confirm,
            "abort" | "no" => Self::Abort,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            other => {
                return Err(AppError::Validation(format!(
                    "unknown command '{other}', type 'help'"
                )));
            }
        };

        Ok(Some(command))
    }
}

fn clearable(value: &str) -> String {
    if value == "-" {
        String::new()
    } else {
        value.to_owned()
    }
}

fn split_argument<'a>(verb: &str, rest: &'a str) -> AppResult<(&'a str, &'a str)> {
    let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
    if name.is_empty() {
        return Err(AppError::Validation(format!("{verb} needs a field name")));
    }

    Ok((name, value.trim()))
}

fn parse_page(value: &str) -> AppResult<u32> {
    value
        .parse::<u32>()
        .ok()
        .filter(|page| *page >= 1)
        .ok_or_else(|| AppError::Validation(format!("page must be at least 1, got '{value}'")))
}

fn record_id(verb: &str, rest: &str) -> AppResult<RecordId> {
    if rest.is_empty() {
        return Err(AppError::Validation(format!("{verb} needs a record id")));
    }

    Ok(RecordId::new(rest))
}

fn parse_flag(value: &str) -> AppResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => Err(AppError::Validation(format!(
            "flag value must be on or off, got '{other}'"
        ))),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum OpenForm {
    #[default]
    Create,
    Edit,
}

/// Reads commands until `quit` or end of input.
pub async fn run<B, I>(page: &ResourcePage<B>, input: I) -> AppResult<()>
where
    B: ResourceBinding,
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut open_form = OpenForm::default();
    print_table(page).await;

    while let Some(line) = lines
        .next_line()
        .await
        .map_err(|error| AppError::Internal(format!("failed to read input: {error}")))?
    {
        let command = match Command::parse(line.as_str()) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                println!("{}", error.message());
                continue;
            }
        };

        if command == Command::Quit {
            break;
        }
        execute(page, &mut open_form, command).await;
    }

    Ok(())
}

async fn execute<B: ResourceBinding>(
    page: &ResourcePage<B>,
    open_form: &mut OpenForm,
    command: Command,
) {
    // Failures are already reported through the notifier.
    let refreshed = match command {
        Command::List => page.open().await.is_ok(),
        Command::Filter(key, value) => page.apply_filter(key, value.as_str()).await.is_ok(),
        Command::Page(number) => page.go_to_page(number).await.is_ok(),
        Command::New => {
            *open_form = OpenForm::Create;
            page.create_form().cancel().await;
            print_draft(page.create_form()).await;
            false
        }
        Command::Edit(record_id) => {
            if page.begin_edit(&record_id).await.is_ok() {
                *open_form = OpenForm::Edit;
                print_draft(page.edit_form()).await;
            }
            false
        }
        Command::Set(field, value) => {
            let form = form_for(page, *open_form);
            form.set_text(field.as_str(), value.as_str()).await;
            print_draft(form).await;
            false
        }
        Command::Flag(field, value) => {
            let form = form_for(page, *open_form);
            form.set_flag(field.as_str(), value).await;
            print_draft(form).await;
            false
        }
        Command::Save => match form_for(page, *open_form).submit().await {
            Ok(SubmitOutcome::Created(_) | SubmitOutcome::Updated(_)) => {
                // The edit draft is blank after a save.
                *open_form = OpenForm::Create;
                true
            }
            Ok(_) | Err(_) => false,
        },
        Command::Cancel => {
            form_for(page, *open_form).cancel().await;
            *open_form = OpenForm::Create;
            false
        }
        Command::Toggle(record_id) => page.toggle_status(&record_id).await.is_ok(),
        Command::Delete(record_id) => {
            if page.request_delete(&record_id).await.is_ok() {
                println!("delete {} {record_id}? type 'confirm' or 'abort'", B::NAME);
            }
            false
        }
        Command::Confirm => page.confirm_delete().await.is_ok(),
        Command::Abort => {
            if page.cancel_delete().await.is_some() {
                println!("delete aborted");
            }
            false
        }
        Command::Help => {
            println!("{HELP}");
            false
        }
        Command::Quit => false,
    };

    if refreshed {
        print_table(page).await;
    }
}

async fn print_table<B: ResourceBinding>(page: &ResourcePage<B>) {
    let view = page.table_view().await;
    let snapshot = page.list().snapshot().await;
    println!("{}", render_page::<B>(&view, &snapshot));
}

fn form_for<B: ResourceBinding>(
    page: &ResourcePage<B>,
    open_form: OpenForm,
) -> &MutationController<B> {
    match open_form {
        OpenForm::Create => page.create_form(),
        OpenForm::Edit => page.edit_form(),
    }
}

async fn print_draft<B: ResourceBinding>(form: &MutationController<B>) {
    println!("{}", render_draft(&form.draft().await));
}

/// Renders the table area with its pagination footer.
pub fn render_page<B: ResourceBinding>(
    view: &TableView<B::Record>,
    snapshot: &ListSnapshot<B::Record>,
) -> String {
    let rows = match view {
        TableView::Loading => return "Loading…".to_owned(),
        TableView::Empty => return "No data".to_owned(),
        TableView::Rows(rows) => rows,
    };

    let columns = B::columns();
    let mut lines = vec![columns.join(" | ")];
    for record in rows {
        let object = serde_json::to_value(record).unwrap_or(Value::Null);
        let cells: Vec<String> = columns
            .iter()
            .map(|column| cell_text(object.get(*column)))
            .collect();
        lines.push(cells.join(" | "));
    }
    lines.push(format!(
        "page {} of {}, {} records",
        snapshot.result.page(),
        snapshot.result.total_pages(),
        snapshot.result.total()
    ));

    lines.join("\n")
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "-".to_owned(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| cell_text(Some(item)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

fn render_draft(draft: &MutationDraft) -> String {
    let heading = match draft.record_id() {
        Some(record_id) => format!("editing {record_id}"),
        None => "new record".to_owned(),
    };
    let fields = serde_json::to_string(draft.fields()).unwrap_or_default();
    format!("{heading}: {fields}")
}
