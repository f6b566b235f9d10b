use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use tuition::config::{
    config_dir, load_config, load_payments, load_students, resolve_data_path, CONFIG_TEMPLATE,
    EMPTY_LIST,
};
use tuition::format::{add_summary_footer, format_date, format_money};
use tuition::{
    month_statuses, BillingMonth, MonthSummary, Payment, PaymentStats, PaymentStatus, Result,
    Student, StudentMonthStatus, TuitionError,
};

#[derive(Parser)]
#[command(name = "tuition")]
#[command(version, about = "Monthly tuition payment status for education centers", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.tuition or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); TUITION_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Show who has paid for a month
    Status {
        /// Billing month in YYYY-MM format (default: current month)
        #[arg(short, long)]
        month: Option<String>,

        /// Only show students with this status (paid, partial, unpaid)
        #[arg(short, long)]
        status: Option<String>,

        /// Only show students enrolled in this group
        #[arg(short, long)]
        group: Option<String>,

        /// Count only payments confirmed by an admin
        #[arg(long)]
        confirmed_only: bool,

        /// Print statuses as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List students in the roster snapshot
    Students,

    /// List recorded payments
    Payments {
        /// Only payments for this student id
        #[arg(long)]
        student: Option<i64>,

        /// Only payments dated in this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show confirmed and pending payment totals
    Stats {
        /// Only payments dated in this month (YYYY-MM)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Show configuration and snapshot overview
    Info,
}

fn main() {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn setup_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("TUITION_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,tuition={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };
    tracing::debug!(config_dir = %cfg_dir.display(), "resolved config directory");

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status {
            month,
            status,
            group,
            confirmed_only,
            json,
        } => cmd_status(
            &cfg_dir,
            StatusFilters {
                month,
                status,
                group,
                confirmed_only,
            },
            json,
        ),
        Commands::Students => cmd_students(&cfg_dir),
        Commands::Payments { student, month } => cmd_payments(&cfg_dir, student, month),
        Commands::Stats { month } => cmd_stats(&cfg_dir, month),
        Commands::Info => cmd_info(&cfg_dir),
    }
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(TuitionError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("students.json"), EMPTY_LIST)?;
    fs::write(cfg_dir.join("payments.json"), EMPTY_LIST)?;

    println!("Initialized tuition config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set the center name and fees:   $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Export the student listing to:  {}/students.json",
        cfg_dir.display()
    );
    println!(
        "  3. Export the payment listing to:  {}/payments.json",
        cfg_dir.display()
    );
    println!();
    println!("Then check this month's payments:");
    println!("  tuition status");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct StatusRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "STUDENT")]
    student: String,
    #[tabled(rename = "GROUP")]
    group: String,
    #[tabled(rename = "FEE")]
    fee: String,
    #[tabled(rename = "PAID")]
    paid: String,
    #[tabled(rename = "DEBT")]
    debt: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "LAST PAYMENT")]
    last_payment: String,
    #[tabled(rename = "ACTION")]
    action: String,
}

#[derive(Tabled)]
struct StudentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "PHONE")]
    phone: String,
    #[tabled(rename = "GROUPS")]
    groups: String,
}

#[derive(Tabled)]
struct PaymentRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "STUDENT")]
    student: String,
    #[tabled(rename = "GROUP")]
    group: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "METHOD")]
    method: String,
    #[tabled(rename = "CONFIRMED")]
    confirmed: String,
}

fn group_label(student: &Student) -> String {
    let names = student.group_names();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

fn parse_month_arg(month: Option<&str>) -> Result<Option<BillingMonth>> {
    month.map(BillingMonth::parse).transpose()
}

struct StatusFilters {
    month: Option<String>,
    status: Option<String>,
    group: Option<String>,
    confirmed_only: bool,
}

/// Show the per-student payment status for one month
fn cmd_status(cfg_dir: &Path, filters: StatusFilters, json: bool) -> Result<()> {
    let config = load_config(cfg_dir)?;

    let month = parse_month_arg(filters.month.as_deref())?.unwrap_or_else(BillingMonth::current);
    let status_filter = filters
        .status
        .as_deref()
        .map(|s| PaymentStatus::parse(s).ok_or_else(|| TuitionError::InvalidStatusFilter(s.to_string())))
        .transpose()?;

    let students = load_students(cfg_dir, &config)?;
    let mut payments = load_payments(cfg_dir, &config)?;
    if filters.confirmed_only || config.billing.confirmed_only {
        payments.retain(Payment::is_confirmed);
    }

    let fees = config.billing.fee_schedule();
    let statuses = month_statuses(&students, &payments, month, &fees);

    // Filters narrow the view only; per-student values are already computed
    let shown: Vec<(&Student, &StudentMonthStatus)> = students
        .iter()
        .zip(statuses.iter())
        .filter(|(_, s)| status_filter.map_or(true, |f| s.status == f))
        .filter(|(student, _)| {
            filters
                .group
                .as_deref()
                .map_or(true, |g| student.in_group(g))
        })
        .collect();

    if json {
        let out: Vec<&StudentMonthStatus> = shown.iter().map(|(_, s)| *s).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("Payment status for {} ({})", month.label(), month);

    if shown.is_empty() {
        println!("No students match the given filters.");
        return Ok(());
    }

    let currency = config.billing.currency.as_str();
    let rows: Vec<StatusRow> = shown
        .iter()
        .map(|(student, s)| StatusRow {
            id: student.id,
            student: student.display_name(),
            group: group_label(student),
            fee: format_money(s.fee, currency),
            paid: format_money(s.paid_this_month, currency),
            debt: format_money(s.debt, currency),
            status: s.status.to_string(),
            last_payment: format_date(s.last_payment_date),
            action: s.action().to_string(),
        })
        .collect();

    let summary = MonthSummary::of(shown.iter().map(|(_, s)| *s));

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let table = add_summary_footer(
        &table,
        3,
        &[
            ("EXPECTED", format_money(summary.expected, currency)),
            ("(-) COLLECTED", format_money(summary.collected, currency)),
            ("(=) OUTSTANDING", format_money(summary.outstanding, currency)),
        ],
    );
    println!("{table}");

    println!();
    println!(
        "{} students: {} paid, {} partial, {} unpaid",
        summary.students(),
        summary.paid,
        summary.partial,
        summary.unpaid
    );

    Ok(())
}

/// List students in the roster snapshot
fn cmd_students(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let students = load_students(cfg_dir, &config)?;

    if students.is_empty() {
        println!("No students in roster.");
        println!(
            "Export the student listing to: {}",
            resolve_data_path(&config.data.students, cfg_dir).display()
        );
        return Ok(());
    }

    let rows: Vec<StudentRow> = students
        .iter()
        .map(|s| StudentRow {
            id: s.id,
            name: s.display_name(),
            phone: s.phone.clone().unwrap_or_else(|| "-".to_string()),
            groups: group_label(s),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!("Total: {} students", students.len());

    Ok(())
}

/// List payments, optionally for one student and month
fn cmd_payments(cfg_dir: &Path, student: Option<i64>, month: Option<String>) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let month = parse_month_arg(month.as_deref())?;
    let payments = load_payments(cfg_dir, &config)?;

    let filtered: Vec<&Payment> = payments
        .iter()
        .filter(|p| student.map_or(true, |id| p.student_id == id))
        .filter(|p| match month {
            Some(m) => p.payment_date.as_ref().is_some_and(|d| m.contains(d)),
            None => true,
        })
        .collect();

    if filtered.is_empty() {
        println!("No payments found with the given filters.");
        return Ok(());
    }

    let currency = config.billing.currency.as_str();
    let rows: Vec<PaymentRow> = filtered
        .iter()
        .map(|p| PaymentRow {
            id: p.id,
            date: format_date(p.payment_date),
            student: p
                .student_name
                .clone()
                .unwrap_or_else(|| format!("#{}", p.student_id)),
            group: p.group_name.clone().unwrap_or_else(|| "-".to_string()),
            amount: format_money(p.amount, currency),
            method: p.method_label().to_string(),
            confirmed: if p.is_confirmed() { "yes" } else { "pending" }.to_string(),
        })
        .collect();

    let total: f64 = filtered.iter().map(|p| p.amount).sum();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!(
        "Total: {} payments, {}",
        filtered.len(),
        format_money(total, currency)
    );

    Ok(())
}

/// Show confirmed vs pending payment totals
fn cmd_stats(cfg_dir: &Path, month: Option<String>) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let month = parse_month_arg(month.as_deref())?;
    let payments = load_payments(cfg_dir, &config)?;
    let stats = PaymentStats::collect(&payments, month);
    let currency = config.billing.currency.as_str();

    match month {
        Some(m) => println!("Payment Stats for {}", m.label()),
        None => println!("Payment Stats"),
    }
    println!("{}", "-".repeat(50));
    println!("Payments:         {}", stats.total_payments);
    println!("Total amount:     {}", format_money(stats.total_amount, currency));
    println!(
        "Confirmed:        {} ({} payments)",
        format_money(stats.confirmed_amount, currency),
        stats.confirmed_count
    );
    println!(
        "Pending:          {} ({} payments)",
        format_money(stats.pending_amount, currency),
        stats.pending_count
    );

    Ok(())
}

/// Show configuration overview
fn cmd_info(cfg_dir: &Path) -> Result<()> {
    let config = load_config(cfg_dir)?;
    let students = load_students(cfg_dir, &config)?;
    let payments = load_payments(cfg_dir, &config)?;
    let currency = config.billing.currency.as_str();

    println!("Tuition Info");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Center:           {}", config.center.name);
    if let Some(phone) = &config.center.phone {
        println!("Phone:            {}", phone);
    }
    println!(
        "Monthly fee:      {}",
        format_money(config.billing.monthly_fee, currency)
    );
    if config.billing.confirmed_only {
        println!("Counting:         confirmed payments only");
    }
    println!("Students:         {}", students.len());
    println!("Payments:         {}", payments.len());
    println!("Current month:    {}", BillingMonth::current());

    if !config.billing.group_fees.is_empty() {
        println!();
        println!("Group fees:");
        for (group, fee) in &config.billing.group_fees {
            println!("  {} - {}", group, format_money(*fee, currency));
        }
    }

    Ok(())
}
