use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use labexam_core::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "labexam")]
#[command(about = "Laboratory exam manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage exam profiles
    Profiles {
        #[command(subcommand)]
        action: ProfileAction,
    },

    /// Enter exam values against a profile and render the report
    Report {
        /// Profile to measure against
        #[arg(long)]
        profile: String,

        /// Exam date (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Entered value, as CATEGORY/Exam=value (repeatable)
        #[arg(long = "value")]
        values: Vec<String>,

        /// Print the fixed-width table instead of plain text
        #[arg(long)]
        table: bool,

        /// Also write a PDF report to this path
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// PDF page orientation (portrait or landscape)
        #[arg(long)]
        orientation: Option<String>,
    },

    /// Export or import all profile data
    Backup {
        #[command(subcommand)]
        action: BackupAction,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// List all profiles
    List,

    /// Show one profile's categories and exams
    Show { name: String },

    /// Create a custom profile
    Create {
        name: String,

        /// Category selection, as CATEGORY:Exam1,Exam2 (repeatable)
        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a custom profile
    Delete { name: String },

    /// Toggle a profile's favorite mark
    Favorite { name: String },
}

#[derive(Subcommand)]
enum BackupAction {
    /// Write all profile data to a JSON backup file
    Export { path: PathBuf },

    /// Replace all profile data with a backup file's contents
    Import { path: PathBuf },
}

fn main() {
    labexam_core::logging::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = data_dir.join("profiles.json");

    let catalog = get_default_catalog();
    let mut store = load_store(&store_path, catalog)?;

    match cli.command {
        Commands::Profiles { action } => match action {
            ProfileAction::List => cmd_profiles_list(&store),
            ProfileAction::Show { name } => {
                cmd_profile_show(&mut store, catalog, &name)?;
                save_store(&store, &store_path)
            }
            ProfileAction::Create {
                name,
                categories,
                description,
            } => {
                cmd_profile_create(&mut store, catalog, &name, &categories, &description)?;
                save_store(&store, &store_path)
            }
            ProfileAction::Delete { name } => {
                store.delete(&name)?;
                println!("Profile '{name}' deleted.");
                save_store(&store, &store_path)
            }
            ProfileAction::Favorite { name } => {
                let favorited = store.toggle_favorite(&name)?;
                if favorited {
                    println!("Profile '{name}' marked as favorite.");
                } else {
                    println!("Profile '{name}' removed from favorites.");
                }
                save_store(&store, &store_path)
            }
        },

        Commands::Report {
            profile,
            date,
            values,
            table,
            pdf,
            orientation,
        } => {
            let outcome = cmd_report(
                &mut store,
                catalog,
                &config,
                &profile,
                date,
                &values,
                table,
                pdf,
                orientation,
            );
            // The profile fetch counts as a use even when entry fails.
            save_store(&store, &store_path)?;
            outcome
        }

        Commands::Backup { action } => match action {
            BackupAction::Export { path } => {
                store.to_backup().save(&path)?;
                println!("Profile data exported to {}.", path.display());
                Ok(())
            }
            BackupAction::Import { path } => {
                let raw = std::fs::read_to_string(&path)?;
                let backup = StoreBackup::from_json(&raw)?;
                store.restore(backup);
                save_store(&store, &store_path)?;
                println!("Profile data imported from {}.", path.display());
                Ok(())
            }
        },
    }
}

fn load_store(path: &Path, catalog: &ReferenceCatalog) -> Result<ProfileStore> {
    let mut store = ProfileStore::new();
    if let Some(backup) = StoreBackup::load(path)? {
        store.restore(backup);
    }
    if store.is_empty() {
        store.seed_defaults(catalog);
        save_store(&store, path)?;
    }
    Ok(store)
}

fn save_store(store: &ProfileStore, path: &Path) -> Result<()> {
    store.to_backup().save(path)
}

fn cmd_profiles_list(store: &ProfileStore) -> Result<()> {
    let mut summaries = store.list();
    if summaries.is_empty() {
        println!("No exam profiles.");
        return Ok(());
    }

    // Favorites first, then by name.
    summaries.sort_by_key(|s| (!s.is_favorite, s.name.clone()));

    for summary in summaries {
        let star = if summary.is_favorite { "⭐ " } else { "" };
        let kind = if summary.is_default { "padrão" } else { "personalizado" };
        println!("{}{} ({})", star, summary.name, kind);
        if !summary.description.is_empty() {
            println!("  {}", summary.description);
        }
        println!(
            "  Exames: {}  Categorias: {}  Último uso: {}",
            summary.exam_count,
            summary.category_count,
            summary.last_used.with_timezone(&Local).format("%d/%m/%Y %H:%M")
        );
        println!();
    }
    Ok(())
}

fn cmd_profile_show(
    store: &mut ProfileStore,
    catalog: &ReferenceCatalog,
    name: &str,
) -> Result<()> {
    let profile = store.get(name)?;

    println!("{}", profile.name);
    if !profile.description.is_empty() {
        println!("{}", profile.description);
    }
    println!();

    for (category, exams) in &profile.categories {
        if exams.is_empty() {
            continue;
        }
        println!("{category}");
        for exam in exams {
            match catalog.range(category, exam) {
                Some(range) => println!(
                    "  {exam} (Ref: {} {})",
                    range.reference_label(),
                    range.unit
                ),
                None => println!("  {exam}"),
            }
        }
        println!();
    }
    Ok(())
}

fn cmd_profile_create(
    store: &mut ProfileStore,
    catalog: &ReferenceCatalog,
    name: &str,
    category_specs: &[String],
    description: &str,
) -> Result<()> {
    if category_specs.is_empty() {
        return Err(Error::MissingValue("at least one --category".to_string()));
    }

    let mut categories = BTreeMap::new();
    for spec in category_specs {
        let (category, exam_list) = spec.split_once(':').ok_or_else(|| {
            Error::InvalidArgument(format!(
                "category '{spec}': expected CATEGORY:Exam1,Exam2"
            ))
        })?;

        let mut exams = Vec::new();
        for exam in exam_list.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            if catalog.range(category, exam).is_none() {
                return Err(Error::NotFound(format!("exam '{category}/{exam}'")));
            }
            exams.push(exam.to_string());
        }
        categories.insert(category.to_string(), exams);
    }

    let profile = store.create(name, categories, description)?;
    println!(
        "Profile '{}' created ({} exams in {} categories).",
        profile.name,
        profile.exam_count(),
        profile.category_count()
    );
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_report(
    store: &mut ProfileStore,
    catalog: &ReferenceCatalog,
    config: &Config,
    profile_name: &str,
    date: Option<String>,
    value_specs: &[String],
    table: bool,
    pdf: Option<PathBuf>,
    orientation: Option<String>,
) -> Result<()> {
    let profile = store.get(profile_name)?;

    let date_format = config.report.date_format.as_str();
    let date_label = date.unwrap_or_else(|| Local::now().format(date_format).to_string());
    let parsed = NaiveDate::parse_from_str(&date_label, date_format)
        .map_err(|e| Error::InvalidArgument(format!("date '{date_label}': {e}")))?;
    let midnight = parsed
        .and_hms_opt(0, 0, 0)
        .and_then(|naive| naive.and_local_timezone(Local).earliest())
        .ok_or_else(|| Error::InvalidArgument(format!("date '{date_label}'")))?;
    validate::validate_date(Some(midnight.with_timezone(&chrono::Utc)))?;

    let mut set = ResultSet::new(profile.name.clone(), date_label);
    for spec in value_specs {
        let (exam_path, raw) = spec.split_once('=').ok_or_else(|| {
            Error::InvalidArgument(format!("value '{spec}': expected CATEGORY/Exam=value"))
        })?;
        let (category, exam) = exam_path.split_once('/').ok_or_else(|| {
            Error::InvalidArgument(format!("value '{spec}': expected CATEGORY/Exam=value"))
        })?;

        let listed = profile
            .categories
            .get(category)
            .is_some_and(|exams| exams.iter().any(|e| e == exam));
        if !listed {
            return Err(Error::NotFound(format!(
                "exam '{category}/{exam}' in profile '{}'",
                profile.name
            )));
        }

        set.record(catalog, category, exam, raw)?;
    }

    if set.is_empty() {
        return Err(Error::MissingValue("at least one exam value".to_string()));
    }

    if let Some(pdf_path) = pdf {
        let mut exporter = PdfExporter::new(set.clone());
        exporter.set_orientation(config.report.orientation);
        if let Some(raw) = &orientation {
            exporter.set_orientation_str(raw)?;
        }
        let bytes = exporter.export()?;
        std::fs::write(&pdf_path, bytes)?;
        println!("PDF written to {}.", pdf_path.display());
        println!();
    } else if orientation.is_some() {
        return Err(Error::InvalidArgument(
            "--orientation requires --pdf".to_string(),
        ));
    }

    let formatter = ResultFormatter::new(set);
    if table {
        println!("{}", formatter.format_tabular());
    } else {
        println!("{}", formatter.format_text());
    }
    Ok(())
}
