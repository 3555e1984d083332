use std::process::Command;

#[derive(Debug)]
struct Kpis {
    input_kwh: f64,
    seasonal_efficiency: f64,
    cycling_steps: f64,
    unmet_dhw_kwh: f64,
}

#[test]
fn scenario_files_run_via_cli_and_produce_distinct_dynamics() {
    let baseline = run_and_parse_kpis(&["--scenario", "scenarios/baseline.toml"]);
    let heat_pump = run_and_parse_kpis(&["--scenario", "scenarios/heat_pump.toml"]);
    let cold_mixed = run_and_parse_kpis(&["--scenario", "scenarios/cold_mixed.toml"]);

    assert!(
        heat_pump.seasonal_efficiency > 1.0,
        "expected heat pump efficiency above 1, got {:.3}",
        heat_pump.seasonal_efficiency
    );
    assert!(
        baseline.seasonal_efficiency < 1.0,
        "expected combi efficiency below 1, got {:.3}",
        baseline.seasonal_efficiency
    );
    assert!(
        heat_pump.input_kwh < baseline.input_kwh,
        "expected heat pump to use less input: heat_pump={:.3}, baseline={:.3}",
        heat_pump.input_kwh,
        baseline.input_kwh
    );
    assert!(
        cold_mixed.cycling_steps > baseline.cycling_steps,
        "expected the oversized combi to cycle more: cold_mixed={}, baseline={}",
        cold_mixed.cycling_steps,
        baseline.cycling_steps
    );
    assert!(
        cold_mixed.unmet_dhw_kwh > 0.0,
        "expected a high-flow bath to exceed 26 kW"
    );
}

#[test]
fn baseline_file_matches_baseline_preset() {
    let from_file = run_stdout(&["--scenario", "scenarios/baseline.toml"]);
    let from_preset = run_stdout(&["--preset", "baseline"]);
    assert_eq!(from_file, from_preset);
}

#[test]
fn supply_path_override_changes_the_run() {
    let hot = run_and_parse_kpis(&["--preset", "baseline"]);
    let cold = run_and_parse_kpis(&["--preset", "baseline", "--supply-path", "cold"]);
    assert!(cold.input_kwh < hot.input_kwh);
}

#[test]
fn unknown_preset_fails() {
    let output = Command::new(env!("CARGO_BIN_EXE_heatsim"))
        .args(["--preset", "nonexistent"])
        .output()
        .expect("heatsim process should run");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown preset"));
}

fn run_stdout(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_heatsim"))
        .args(args)
        .output()
        .expect("heatsim process should run");

    assert!(
        output.status.success(),
        "run failed for {args:?}: stderr={} ",
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8(output.stdout).expect("stdout should be valid UTF-8")
}

fn run_and_parse_kpis(args: &[&str]) -> Kpis {
    let stdout = run_stdout(args);
    Kpis {
        input_kwh: parse_metric(&stdout, "Energy input:", "kWh"),
        seasonal_efficiency: parse_metric(&stdout, "Seasonal efficiency:", ""),
        cycling_steps: parse_metric(&stdout, "Cycling steps:", ""),
        unmet_dhw_kwh: parse_metric(&stdout, "Unmet hot water:", "kWh"),
    }
}

fn parse_metric(stdout: &str, label: &str, unit: &str) -> f64 {
    let line = stdout
        .lines()
        .find(|line| line.trim_start().starts_with(label))
        .unwrap_or_else(|| panic!("missing KPI line `{label}` in output: {stdout}"));

    let raw = line
        .split_once(':')
        .map(|(_, right)| right.trim())
        .unwrap_or_else(|| panic!("invalid KPI format for line `{line}`"));

    let numeric = raw.strip_suffix(unit).unwrap_or(raw).trim();
    numeric
        .parse::<f64>()
        .unwrap_or_else(|_| panic!("failed parsing `{numeric}` from KPI line `{line}`"))
}
