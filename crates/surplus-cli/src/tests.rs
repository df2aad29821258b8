use super::*;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[test]
fn parses_run_with_defaults() {
    let cli = Cli::try_parse_from(["surplus", "run"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            host: None,
            county: None,
            date: None,
            dry_run: false
        }
    ));
}

#[test]
fn parses_run_with_host_and_site_date() {
    let cli = Cli::try_parse_from([
        "surplus",
        "run",
        "--host",
        "manatee.realforeclose.com",
        "--date",
        "09/16/2024",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            host: Some(ref h),
            county: None,
            date: Some(d),
            dry_run: false
        } if h == "manatee.realforeclose.com" && d == date(2024, 9, 16)
    ));
}

#[test]
fn parses_run_with_county_iso_date_and_dry_run() {
    let cli = Cli::try_parse_from([
        "surplus",
        "run",
        "--county",
        "miami-dade",
        "--date",
        "2024-09-16",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Run {
            host: None,
            county: Some(ref c),
            date: Some(d),
            dry_run: true
        } if c == "miami-dade" && d == date(2024, 9, 16)
    ));
}

#[test]
fn run_rejects_host_together_with_county() {
    let result = Cli::try_parse_from([
        "surplus",
        "run",
        "--host",
        "manatee.realforeclose.com",
        "--county",
        "Manatee",
    ]);
    assert!(result.is_err());
}

#[test]
fn run_rejects_unparseable_date() {
    let result = Cli::try_parse_from(["surplus", "run", "--date", "16.09.2024"]);
    assert!(result.is_err());
}

#[test]
fn parses_batch_with_counties_file() {
    let cli = Cli::try_parse_from([
        "surplus",
        "batch",
        "--counties",
        "config/counties.yaml",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Batch {
            date: None,
            counties: Some(ref p),
            dry_run: true
        } if p == &PathBuf::from("config/counties.yaml")
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["surplus"]).is_err());
}

#[test]
fn auction_date_accepts_both_formats() {
    assert_eq!(parse_auction_date("09/16/2024"), Ok(date(2024, 9, 16)));
    assert_eq!(parse_auction_date("2024-09-16"), Ok(date(2024, 9, 16)));
    assert_eq!(parse_auction_date(" 1/5/2025 "), Ok(date(2025, 1, 5)));
}

#[test]
fn auction_date_rejects_impossible_dates() {
    let err = parse_auction_date("02/30/2024").unwrap_err();
    assert!(err.contains("02/30/2024"));
    assert!(parse_auction_date("").is_err());
}
