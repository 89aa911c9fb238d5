//! End-to-end scenarios through the controller: CSV ingestion, filtering,
//! range windowing, binning, ranking, and replay sequencing.

use std::io::Write;
use std::time::Instant;

use tempfile::NamedTempFile;

use errlens::analysis::range::DisplayMode;
use errlens::dataset::{LoadOptions, SelectedColumns, load_csv};
use errlens::egui_app::controller::EguiController;

fn write_linear_csv(rows: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "load,error_ridge,error_forest").unwrap();
    for row in 0..rows {
        writeln!(
            file,
            "{},{:.3},{:.3}",
            row + 1,
            ((row % 7) as f64 - 3.0) * 0.1,
            ((row % 5) as f64 - 2.0) * 0.2,
        )
        .unwrap();
    }
    file
}

fn write_grouped_csv() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "load,error_ridge,error_forest,site").unwrap();
    let sites = ["a", "a", "a", "b", "b", "b", "b", "b", "b", "b"];
    for (row, site) in sites.iter().enumerate() {
        writeln!(
            file,
            "{},{:.3},{:.3},{}",
            row + 1,
            (row as f64 * 0.7).sin() * 0.5,
            (row as f64 * 1.3).cos() * 0.5,
            site,
        )
        .unwrap();
    }
    file
}

fn open_controller(file: &NamedTempFile, individual: Option<&str>) -> EguiController {
    let options = LoadOptions::default();
    let dataset = load_csv(file.path(), &options).unwrap();
    let columns = SelectedColumns {
        target: "load".into(),
        individual: individual.map(String::from),
        models: ["ridge".into(), "forest".into()],
    };
    let mut controller = EguiController::new();
    controller.attach_session(file.path().to_path_buf(), options, dataset, columns);
    assert!(controller.ui.controls.enabled, "session should attach");
    controller
}

#[test]
fn hundred_rows_split_into_ten_even_bins() {
    let file = write_linear_csv(100);
    let mut controller = open_controller(&file, None);
    controller.set_bin_count(10);

    let summary = controller.ui.summary.as_ref().unwrap();
    assert_eq!(summary.groups.len(), 10);
    assert!(summary.groups.iter().all(|g| g.first.is_some() && g.second.is_some()));

    // Bin 1 holds exactly the rows with the ten smallest targets.
    controller.pick_bin(1);
    let detail = controller.ui.detail.as_ref().unwrap();
    assert_eq!(detail.points.len(), 10);
    assert_eq!(detail.subtitle.as_deref(), Some("Values between 1 and 10"));
}

#[test]
fn grouped_timestep_window_keeps_first_rows_per_individual() {
    let file = write_grouped_csv();
    let mut controller = open_controller(&file, Some("site"));

    controller.set_display_mode(DisplayMode::Timesteps);
    assert_eq!(controller.ui.controls.range.max, 7.0, "largest group has 7 rows");

    controller.set_range(0.0, 2.0);
    let detail = controller.ui.detail.as_ref().unwrap();
    // First two observations of each individual, regardless of group sizes.
    assert_eq!(detail.points.len(), 4);
    assert!(detail.title.contains("time steps 0 to 2"));
}

#[test]
fn target_window_filters_by_value() {
    let file = write_linear_csv(100);
    let mut controller = open_controller(&file, None);
    controller.set_range(11.0, 30.0);
    assert_eq!(controller.ui.detail.as_ref().unwrap().points.len(), 20);
}

#[test]
fn replay_fires_each_bin_then_restores_idle() {
    let file = write_linear_csv(100);
    let mut controller = open_controller(&file, None);
    controller.set_bin_count(5);

    let step = controller.replay_step();
    let start = Instant::now();
    controller.start_replay(start);

    let mut fired = vec![controller.ui.summary.as_ref().unwrap().selected_bin];
    let mut now = start;
    for _ in 0..4 {
        now += step;
        controller.tick_replay(now);
        fired.push(controller.ui.summary.as_ref().unwrap().selected_bin);
    }
    assert_eq!(fired, vec![1, 2, 3, 4, 5]);

    now += step;
    controller.tick_replay(now);
    assert!(!controller.replay_running());
    assert!(!controller.controls_locked());
    assert_eq!(controller.ui.summary.as_ref().unwrap().selected_bin, 0);
}

#[test]
fn cancelling_replay_prevents_further_steps() {
    let file = write_linear_csv(100);
    let mut controller = open_controller(&file, None);
    controller.set_bin_count(5);

    let step = controller.replay_step();
    let start = Instant::now();
    controller.start_replay(start);
    controller.tick_replay(start + step);
    assert_eq!(controller.ui.summary.as_ref().unwrap().selected_bin, 2);

    controller.cancel_replay();
    controller.tick_replay(start + step * 2);
    controller.tick_replay(start + step * 3);
    assert_eq!(controller.ui.summary.as_ref().unwrap().selected_bin, 0);
    assert!(!controller.replay_running());
}

#[test]
fn replay_locks_manual_controls() {
    let file = write_linear_csv(100);
    let mut controller = open_controller(&file, None);
    controller.set_bin_count(3);
    controller.start_replay(Instant::now());

    controller.set_bin_count(9);
    controller.set_range(5.0, 20.0);
    controller.pick_bin(2);

    let summary = controller.ui.summary.as_ref().unwrap();
    assert_eq!(summary.groups.len(), 3);
    assert_eq!(summary.selected_bin, 1);
    assert_eq!(controller.ui.controls.range.lo, 1.0);
    assert_eq!(controller.ui.controls.range.hi, 100.0);
}

#[test]
fn degenerate_bin_shows_diagnostic_instead_of_plot() {
    // Identical error vectors everywhere: covariance has no spread.
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "load,error_ridge,error_forest").unwrap();
    for row in 0..30 {
        writeln!(file, "{},0.25,-0.75", row + 1).unwrap();
    }
    let controller = open_controller(&file, None);
    assert!(controller.ui.summary.is_some());
    assert!(controller.ui.detail.is_none());
    assert!(
        controller
            .ui
            .detail_notice
            .as_ref()
            .unwrap()
            .contains("Degenerate covariance")
    );
}

#[test]
fn hull_retention_controls_boundary_presence() {
    let file = write_linear_csv(60);
    let mut controller = open_controller(&file, None);

    controller.set_hull_retention(0);
    assert!(controller.ui.detail.as_ref().unwrap().hull.is_empty());

    controller.set_hull_retention(100);
    assert!(!controller.ui.detail.as_ref().unwrap().hull.is_empty());
}
