use appointment_desk::appointment::{DATE_FORMAT, format_date};
use appointment_desk::config::{DATA_FILE_ENV, ON_LOAD_ERROR_ENV};
use appointment_desk::persistence::file::DEFAULT_DATA_FILE;
use appointment_desk::{
    Appointment, AppointmentBackend, AppointmentStore, Doctor, LoadFailurePolicy,
    MutationReport, StoreConfig, StoreResult, export_appointments_to_csv,
    import_appointments_from_csv, logging,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    Json,
    Sqlite,
}

#[derive(Parser, Debug)]
#[command(name = "desk", version, about = "Front-desk appointment book", long_about = None)]
struct Cli {
    /// File holding the appointment list
    #[arg(long, env = DATA_FILE_ENV, default_value = DEFAULT_DATA_FILE)]
    data_file: PathBuf,

    /// What to do with the in-memory list when loading fails (reset|keep)
    #[arg(long, env = ON_LOAD_ERROR_ENV, default_value = "reset")]
    on_load_error: LoadFailurePolicy,

    /// Storage format for the data file
    #[arg(long, value_enum, default_value_t = BackendKind::Json)]
    backend: BackendKind,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "APPOINTMENT_DESK_LOG", default_value = "warn")]
    log_level: String,
}

type DeskStore = AppointmentStore<Box<dyn AppointmentBackend>>;

/// Field values collected from the user, like the inputs of a booking form.
struct Form {
    patient: String,
    doctor: String,
    date: String,
    time: String,
    selected: Option<usize>,
}

impl Form {
    fn new() -> Self {
        Self {
            patient: String::new(),
            doctor: Doctor::default().label().to_string(),
            date: format_date(Local::now().date_naive()),
            time: String::new(),
            selected: None,
        }
    }

    fn clear_all(&mut self) {
        self.patient.clear();
        self.doctor.clear();
        self.date.clear();
        self.time.clear();
    }
}

fn build_store(cli: &Cli) -> Result<DeskStore, String> {
    let config = StoreConfig {
        data_file: cli.data_file.clone(),
        on_load_error: cli.on_load_error,
    };
    match cli.backend {
        BackendKind::Json => Ok(AppointmentStore::from_config(&config).boxed()),
        #[cfg(feature = "sqlite")]
        BackendKind::Sqlite => {
            let backend = appointment_desk::SqliteBackend::new(&config.data_file)
                .map_err(|e| format!("could not open sqlite database: {e}"))?;
            Ok(AppointmentStore::with_backend(backend)
                .with_load_failure_policy(config.on_load_error)
                .boxed())
        }
        #[cfg(not(feature = "sqlite"))]
        BackendKind::Sqlite => {
            Err("Rebuild with the `sqlite` feature to use the sqlite backend.".into())
        }
    }
}

fn render_appointments_table(appointments: &[Appointment], selected: Option<usize>) -> String {
    let mut col_names = vec!["#"];
    col_names.extend(Appointment::columns());

    let rows: Vec<Vec<String>> = appointments
        .iter()
        .enumerate()
        .map(|(idx, appointment)| {
            let marker = if selected == Some(idx) { "*" } else { "" };
            let mut row = vec![format!("{}{}", idx + 1, marker)];
            row.extend(appointment.values().iter().map(|v| v.to_string()));
            row
        })
        .collect();

    // Widths in characters; labels carry accents.
    let mut widths: Vec<usize> = col_names.iter().map(|n| n.chars().count()).collect();
    for row in &rows {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.chars().count());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, col_names.iter().copied(), &widths);
    out.push_str(&sep);
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.zip(widths) {
        out.push(' ');
        out.push_str(cell);
        out.push_str(&" ".repeat(width.saturating_sub(cell.chars().count())));
        out.push_str(" |");
    }
    out.push('\n');
}

fn print_help() {
    println!(
        "Commands:\n  help                          Show this help\n  show                          Show scheduled appointments\n  doctors                       List the doctor roster\n  form                          Show the current form fields\n  patient <name...>             Set patient name\n  doctor  <n|label>             Pick a doctor from the roster\n  date    <YYYY-MM-DD|today>    Set appointment date\n  time    <text...>             Set appointment time (e.g. 09:30)\n  clear                         Blank all form fields (edit keeps blank fields)\n  select  <row>                 Select a row for edit/cancel\n  schedule                      Schedule an appointment from the form\n  edit                          Apply non-blank form fields to the selected row\n  cancel                        Cancel the selected appointment (asks to confirm)\n  save                          Write appointments to the data file\n  load                          Reload appointments from the data file\n  export csv <path>             Export appointments to CSV\n  import csv <path>             Schedule every row of a CSV file\n  quit|exit                     Exit"
    );
}

fn print_doctors() {
    println!("Doctors:");
    for (number, label) in Doctor::variants() {
        println!("  {number}. {label}");
    }
}

fn print_form(form: &Form) {
    let selected = form
        .selected
        .map(|idx| (idx + 1).to_string())
        .unwrap_or_else(|| "none".to_string());
    println!("Patient : {}", form.patient);
    println!("Doctor  : {}", form.doctor);
    println!("Date    : {}", form.date);
    println!("Time    : {}", form.time);
    println!("Selected: {}", selected);
}

fn report_save(report: &MutationReport) {
    if let Some(err) = &report.save_error {
        println!("Warning: could not save appointments: {err}");
    }
}

fn read_line(stdin: &io::Stdin, line: &mut String) -> bool {
    line.clear();
    matches!(stdin.read_line(line), Ok(n) if n > 0)
}

fn confirm(stdin: &io::Stdin, prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    let _ = io::stdout().flush();
    let mut answer = String::new();
    if !read_line(stdin, &mut answer) {
        println!();
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn parse_row(arg: &str) -> Option<usize> {
    arg.parse::<usize>().ok().and_then(|row| row.checked_sub(1))
}

fn parse_date(arg: &str) -> Result<String, String> {
    if arg.eq_ignore_ascii_case("today") {
        return Ok(format_date(Local::now().date_naive()));
    }
    NaiveDate::parse_from_str(arg, DATE_FORMAT)
        .map(format_date)
        .map_err(|e| format!("invalid date '{arg}': {e}"))
}

fn print_result(store: &DeskStore, form: &Form, result: StoreResult<MutationReport>, done: &str) {
    match result {
        Ok(report) => {
            println!("{done}");
            report_save(&report);
            println!("{}", render_appointments_table(store.appointments(), form.selected));
        }
        Err(e) => println!("Error: {e}"),
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(&cli.log_level);

    let mut store = match build_store(&cli) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = store.load() {
        println!("Warning: could not load appointments: {e}");
    }

    let mut form = Form::new();

    println!("Appointment Desk - type 'help' for commands\n");
    println!("{}", render_appointments_table(store.appointments(), form.selected));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        if !read_line(&stdin, &mut line) {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => {
                println!("{}", render_appointments_table(store.appointments(), form.selected));
            }
            "doctors" => print_doctors(),
            "form" => print_form(&form),
            "patient" => form.patient = rest.to_string(),
            "time" => form.time = rest.to_string(),
            "doctor" => match rest.parse::<Doctor>() {
                Ok(doctor) => {
                    form.doctor = doctor.label().to_string();
                    println!("Doctor set to {doctor}.");
                }
                Err(e) => println!("Error: {e}. Type 'doctors' for the roster."),
            },
            "date" => match parse_date(rest) {
                Ok(date) => form.date = date,
                Err(e) => println!("Error: {e}"),
            },
            "clear" => form.clear_all(),
            "select" => match parse_row(rest) {
                Some(idx) if idx < store.len() => {
                    form.selected = Some(idx);
                    println!("Selected row {}.", idx + 1);
                }
                Some(idx) => println!("No appointment at row {}.", idx + 1),
                None => println!("Usage: select <row>"),
            },
            "schedule" => {
                match store.schedule(&form.patient, &form.doctor, &form.date, &form.time) {
                    Ok(report) => {
                        println!("Appointment scheduled.");
                        report_save(&report);
                        form.patient.clear();
                        form.time.clear();
                        println!(
                            "{}",
                            render_appointments_table(store.appointments(), form.selected)
                        );
                    }
                    Err(e) => println!("Error: {e}. Please complete all fields."),
                }
            }
            "edit" => match form.selected {
                Some(idx) => {
                    let result = store.edit(idx, &form.patient, &form.doctor, &form.date, &form.time);
                    print_result(&store, &form, result, "Appointment updated.");
                }
                None => println!("Select an appointment first."),
            },
            "cancel" => match form.selected {
                Some(idx) => {
                    let Some(appointment) = store.get(idx) else {
                        println!("No appointment at row {}.", idx + 1);
                        form.selected = None;
                        continue;
                    };
                    let prompt =
                        format!("Cancel appointment {} for {}?", idx + 1, appointment.patient);
                    if confirm(&stdin, &prompt) {
                        form.selected = None;
                        let result = store.cancel(idx);
                        print_result(&store, &form, result, "Appointment cancelled.");
                    } else {
                        println!("Cancellation aborted.");
                    }
                }
                None => println!("Select an appointment first."),
            },
            "save" => match store.save() {
                Ok(()) => println!("Appointments saved to {}.", store.backend().describe()),
                Err(e) => println!("Warning: could not save appointments: {e}"),
            },
            "load" => {
                form.selected = None;
                match store.load() {
                    Ok(count) => println!(
                        "Loaded {count} appointment(s) from {}.",
                        store.backend().describe()
                    ),
                    Err(e) => println!("Warning: could not load appointments: {e}"),
                }
                println!("{}", render_appointments_table(store.appointments(), form.selected));
            }
            "export" | "import" => {
                let (format, path) = match rest.split_once(char::is_whitespace) {
                    Some((format, path)) => (format, path.trim()),
                    None => (rest, ""),
                };
                if format != "csv" || path.is_empty() {
                    println!("Usage: {cmd} csv <path>");
                    continue;
                }
                if cmd == "export" {
                    match export_appointments_to_csv(store.appointments(), path) {
                        Ok(()) => println!(
                            "Exported {} appointment(s) to {path}.",
                            store.len()
                        ),
                        Err(e) => println!("Error exporting: {e}"),
                    }
                } else {
                    match import_appointments_from_csv(path) {
                        Ok(rows) => {
                            let mut imported = 0;
                            let mut skipped = 0;
                            for (row, a) in rows.iter().enumerate() {
                                match store.schedule(&a.patient, &a.doctor, &a.date, &a.time) {
                                    Ok(report) => {
                                        imported += 1;
                                        report_save(&report);
                                    }
                                    Err(e) => {
                                        skipped += 1;
                                        println!("Skipping CSV row {}: {e}", row + 1);
                                    }
                                }
                            }
                            println!("Imported {imported} appointment(s), skipped {skipped}.");
                            println!(
                                "{}",
                                render_appointments_table(store.appointments(), form.selected)
                            );
                        }
                        Err(e) => println!("Error importing: {e}"),
                    }
                }
            }
            _ => println!("Unknown command. Type 'help'."),
        }
    }
}
