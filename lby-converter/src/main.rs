use std::{
    collections::BTreeSet,
    io,
    path::PathBuf,
    process::ExitCode,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

use clap::{Args, Parser, Subcommand};
use lby_converter::{
    bucket_by_date, completion_line, expand_tilde, list_lby_files, parse_date_selection,
    prompt_for_dates, retain_available, ConvertBatch, ConvertConfig, ConverterError,
    ConverterResult, FileReport, StageConfig, StageSession, DEFAULT_INTAKE_DIR,
};
use lby_core::{DecoderConfig, OutputFormat, LBY_DEFAULT_MAX_YEAR, LBY_SOURCE_TAG};
use log::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "lby",
    version = env!("CARGO_PKG_VERSION"),
    about = "Decode pull-tester .LBY recordings and stage them under UTC names",
    long_about = None,
)]
struct Cli {
    /// Подробный вывод (debug)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Тихий режим (только ошибки)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert .LBY recordings to CSV or JSON
    Convert(ConvertArgs),
    /// Link one day of .LBY recordings into _StagedUTC under canonical names
    Stage(StageArgs),
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Верхняя граница года в заголовке
    #[arg(long, default_value_t = LBY_DEFAULT_MAX_YEAR)]
    max_year: u16,
    /// Помечать поток как 16-битный, если все слова в 0..=65535
    #[arg(long)]
    collapse_16bit: bool,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Каталог с .LBY. Если не задан, спросить
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Каталог для выходных файлов
    #[arg(short, long, default_value = "./output")]
    output: PathBuf,
    /// Даты: 2025-09-10, 2025-09-10,2025-09-12, 2025-09-10..2025-09-19, all
    #[arg(long, conflicts_with = "all")]
    dates: Option<String>,
    /// Все найденные даты без вопроса
    #[arg(long)]
    all: bool,
    /// JSON вместо CSV
    #[arg(long)]
    json: bool,
    /// Только показать, ничего не записывать
    #[arg(long)]
    dry_run: bool,
    /// Перезаписывать существующие файлы
    #[arg(long)]
    force: bool,
    /// Рабочих потоков декодирования
    #[arg(short, long, default_value = "4")]
    jobs: usize,
    #[command(flatten)]
    decode: DecodeArgs,
}

#[derive(Args, Debug)]
struct StageArgs {
    /// Дата YYYY-MM-DD
    #[arg(required_unless_present = "date_flag")]
    date: Option<String>,
    /// То же, что позиционный аргумент
    #[arg(long = "date", id = "date_flag", conflicts_with = "date")]
    date_flag: Option<String>,
    /// Каталог приёма
    #[arg(long, default_value = DEFAULT_INTAKE_DIR)]
    intake_dir: PathBuf,
    #[arg(long)]
    dry_run: bool,
    #[arg(long)]
    force: bool,
    /// Тег источника в каноническом имени
    #[arg(long, default_value = LBY_SOURCE_TAG)]
    source_tag: String,
    #[command(flatten)]
    decode: DecodeArgs,
}

impl DecodeArgs {
    fn to_config(&self) -> DecoderConfig {
        DecoderConfig {
            max_year: self.max_year,
            collapse_u16: self.collapse_16bit,
            ..DecoderConfig::default()
        }
    }
}

fn install_ctrlc(stop_flag: Arc<AtomicBool>) {
    if let Err(e) = ctrlc::set_handler(move || {
        if stop_flag.swap(true, Ordering::SeqCst) {
            // Второй Ctrl+C: принудительный выход
            warn!("Force exit");
            std::process::exit(130);
        }
        warn!("Ctrl+C received, finishing files in progress...");
    }) {
        warn!("Failed to set Ctrl+C handler: {e}");
    }
}

fn prompt_input_dir() -> ConverterResult<PathBuf> {
    let mut line = String::new();
    eprint!("Input directory with .LBY files: ");
    io::stdin().read_line(&mut line)?;

    let raw = line.trim();
    if raw.is_empty() {
        return Err(ConverterError::Config("no input directory given".to_string()));
    }

    Ok(expand_tilde(&PathBuf::from(raw)))
}

fn count_errors(reports: &[FileReport]) -> usize {
    reports.iter().filter(|r| r.is_error()).count()
}

fn run_convert(args: ConvertArgs) -> ConverterResult<usize> {
    let input_dir = match args.input {
        Some(p) => expand_tilde(&p),
        None => prompt_input_dir()?,
    };

    let config = ConvertConfig {
        input_dir,
        output_dir: expand_tilde(&args.output),
        output_format: if args.json { OutputFormat::Json } else { OutputFormat::Csv },
        dry_run: args.dry_run,
        force: args.force,
        jobs: args.jobs,
        decoder: args.decode.to_config(),
    };
    config.validate().map_err(ConverterError::Config)?;

    let (batch, metrics) = ConvertBatch::new(config.clone());
    install_ctrlc(batch.stop_flag());

    let files = list_lby_files(&config.input_dir)?;
    let (buckets, unreadable) = bucket_by_date(batch.decoder(), &files);

    if buckets.is_empty() {
        warn!("No LBY files in {:?}", config.input_dir);
        return Ok(unreadable.len());
    }

    let selected: BTreeSet<String> = if args.all {
        buckets.keys().cloned().collect()
    } else if let Some(sel) = args.dates.as_deref() {
        let keys = buckets.keys().cloned().collect();
        let (present, missing) = retain_available(parse_date_selection(sel, &keys)?, &buckets);

        if !missing.is_empty() {
            warn!("No files for dates: {}", missing.join(", "));
        }
        if present.is_empty() {
            return Err(ConverterError::InvalidSelection(format!("no files for '{sel}'")));
        }
        present
    } else {
        prompt_for_dates(&buckets, &mut io::stdin().lock(), &mut io::stderr())?
    };

    let files: Vec<PathBuf> = selected
        .iter()
        .flat_map(|d| buckets[d].iter().cloned())
        .collect();

    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    info!("  Input         : {:?}", config.input_dir);
    info!("  Output        : {:?}", config.output_dir);
    info!("  Format        : {}", config.output_format);
    info!("  Dates         : {}", selected.iter().cloned().collect::<Vec<_>>().join(", "));
    info!("  Files         : {}", files.len());
    info!("  Jobs          : {}", config.jobs);
    if config.dry_run {
        info!("  Mode          : dry-run");
    }
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let start = Instant::now();
    let reports = batch.run(&files)?;
    let errors = count_errors(&reports) + unreadable.len();

    info!("\n{}", metrics.summary(&start));
    println!(
        "{}",
        completion_line(config.dry_run, reports.len() + unreadable.len(), errors)
    );

    Ok(errors)
}

fn run_stage(args: StageArgs) -> ConverterResult<usize> {
    let date = args
        .date
        .or(args.date_flag)
        .ok_or_else(|| ConverterError::Config("date is required".to_string()))?;

    let config = StageConfig {
        intake_dir: expand_tilde(&args.intake_dir),
        dry_run: args.dry_run,
        force: args.force,
        source_tag: args.source_tag,
        decoder: args.decode.to_config(),
    };

    info!("Staging {date}: {:?} -> {:?}", config.import_dir(&date), config.staged_dir());

    let dry_run = config.dry_run;
    let (session, metrics) = StageSession::new(config);
    let start = Instant::now();
    let reports = session.run(&date)?;
    let errors = count_errors(&reports);

    info!("\n{}", metrics.summary(&start));
    println!("{}", completion_line(dry_run, reports.len(), errors));

    Ok(errors)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = if cli.quiet {
        log::LevelFilter::Error
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .format_timestamp_secs()
        .init();

    let result = match cli.command {
        Command::Convert(args) => run_convert(args),
        Command::Stage(args) => run_stage(args),
    };

    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
