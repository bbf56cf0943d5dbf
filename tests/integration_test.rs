use approx::assert_relative_eq;

use raydec::ellipticity::CycleAnalyzer;
use raydec::signal_processing::{TaperedWindow, design_bandpass, mean};
use raydec::simulation::{RayleighWave, generate_rayleigh_record};
use raydec::{AnalysisContext, RaydecConfig, RaydecError, Record, raydec};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn config(fmin: f64, fmax: f64, fsteps: usize) -> RaydecConfig {
    RaydecConfig {
        fmin,
        fmax,
        fsteps,
        ..Default::default()
    }
}

#[test]
fn test_recovers_ellipticity_of_single_wave() {
    init_logging();
    let record =
        generate_rayleigh_record(600.0, 0.01, &[RayleighWave::new(1.0, 2.0, 40.0)]).unwrap();
    let cfg = config(0.5, 2.0, 5);
    let curve = raydec(&record, &cfg).unwrap();

    assert_eq!(curve.fsteps(), 5);
    assert_eq!(curve.nwind(), 1);

    let step = AnalysisContext::new(&cfg, &record)
        .unwrap()
        .frequency_grid()
        .nearest_index(1.0)
        .unwrap();
    assert_eq!(step, 2);
    assert_relative_eq!(curve.frequencies.get(step, 0), 1.0, max_relative = 1e-12);

    let estimate = curve.ellipticity.get(step, 0);
    assert!(
        (estimate - 2.0).abs() / 2.0 < 0.05,
        "ellipticity at 1 Hz: {}",
        estimate
    );
    assert!(curve.accepted_cycles.get(step, 0) > 100);
}

#[test]
fn test_separates_two_waves_by_frequency() {
    init_logging();
    let record = generate_rayleigh_record(
        300.0,
        0.01,
        &[
            RayleighWave::new(1.0, 2.0, 40.0),
            RayleighWave::new(4.0, 0.5, 120.0),
        ],
    )
    .unwrap();
    let curve = raydec(&record, &config(1.0, 4.0, 3)).unwrap();

    assert_relative_eq!(curve.ellipticity.get(0, 0), 2.0, max_relative = 0.02);
    assert_relative_eq!(curve.ellipticity.get(2, 0), 0.5, max_relative = 0.02);
}

#[test]
fn test_grid_endpoints_are_clipped() {
    let record = Record::from_sample_interval(vec![0.0; 100], vec![0.0; 100], vec![0.0; 100], 0.01)
        .unwrap();
    let ctx = AnalysisContext::new(&config(0.001, 500.0, 20), &record).unwrap();

    assert_relative_eq!(ctx.fstart, 1.0 / 30.0, max_relative = 1e-12);
    assert_relative_eq!(ctx.fend, 50.0, max_relative = 1e-12);

    let grid = ctx.frequency_grid();
    let frequencies = grid.frequencies();
    assert_eq!(frequencies.len(), 20);
    assert_relative_eq!(frequencies[0], 1.0 / 30.0, max_relative = 1e-12);
    assert!(frequencies[19] <= ctx.fnyq);
    assert_relative_eq!(frequencies[19], 50.0, max_relative = 1e-12);
    assert!(frequencies.windows(2).all(|pair| pair[1] > pair[0]));
}

#[test]
fn test_range_beyond_nyquist_is_rejected() {
    let record =
        generate_rayleigh_record(100.0, 0.5, &[RayleighWave::new(0.2, 1.0, 0.0)]).unwrap();
    let err = raydec(&record, &config(2.0, 5.0, 4)).unwrap_err();
    assert!(matches!(err, RaydecError::InvalidFrequencyRange(_)));
}

#[test]
fn test_silent_vertical_gives_no_valid_cells() {
    init_logging();
    let wave = generate_rayleigh_record(30.0, 0.01, &[RayleighWave::new(2.0, 0.8, 10.0)]).unwrap();
    let record = Record::new(
        vec![0.0; wave.len()],
        wave.north().to_vec(),
        wave.east().to_vec(),
        wave.time().to_vec(),
    )
    .unwrap();
    let curve = raydec(&record, &config(1.0, 4.0, 3)).unwrap();

    assert_eq!(curve.invalid_cells().len(), 3);
    for step in 0..3 {
        assert!(!curve.ellipticity.get(step, 0).is_finite());
        assert_eq!(curve.accepted_cycles.get(step, 0), 0);
    }
}

#[test]
fn test_windows_of_periodic_record_agree() {
    let record =
        generate_rayleigh_record(90.0, 0.01, &[RayleighWave::new(2.0, 0.8, 10.0)]).unwrap();
    let cfg = RaydecConfig {
        nwind: 3,
        ..config(1.0, 4.0, 3)
    };
    let ctx = AnalysisContext::new(&cfg, &record).unwrap();
    assert_eq!(ctx.window_len, 3000);

    for index in 0..3 {
        let segment = record.window(index, ctx.window_len);
        assert_eq!(segment.len(), 3000);
        assert_relative_eq!(segment.start_time, index as f64 * 30.0, epsilon = 1e-9);
        assert!(mean(&segment.vertical).abs() < 1e-12);
        assert!(mean(&segment.north).abs() < 1e-12);
        assert!(mean(&segment.east).abs() < 1e-12);
    }

    let curve = raydec(&record, &cfg).unwrap();
    assert_eq!(curve.nwind(), 3);
    for step in 0..3 {
        let reference = curve.ellipticity.get(step, 0);
        assert!(reference.is_finite());
        for window in 1..3 {
            assert_eq!(
                curve.frequencies.get(step, window).to_bits(),
                curve.frequencies.get(step, 0).to_bits()
            );
            assert_relative_eq!(
                curve.ellipticity.get(step, window),
                reference,
                max_relative = 1e-6
            );
        }
    }
    assert_relative_eq!(curve.ellipticity.get(1, 0), 0.8, max_relative = 0.02);
}

#[test]
fn test_reruns_are_bit_identical() {
    let record =
        generate_rayleigh_record(60.0, 0.01, &[RayleighWave::new(1.5, 1.2, 200.0)]).unwrap();
    let cfg = RaydecConfig {
        nwind: 2,
        ..config(0.8, 3.0, 4)
    };
    let first = raydec(&record, &cfg).unwrap();
    let second = raydec(&record, &cfg).unwrap();

    for step in 0..4 {
        for window in 0..2 {
            let (a, b) = (first.cell(step, window), second.cell(step, window));
            assert_eq!(a.frequency.to_bits(), b.frequency.to_bits());
            assert_eq!(a.ellipticity.to_bits(), b.ellipticity.to_bits());
            assert_eq!(a.vertical_amplitude.to_bits(), b.vertical_amplitude.to_bits());
            assert_eq!(a.accepted_cycles, b.accepted_cycles);
        }
    }
}

#[test]
fn test_pool_size_does_not_change_result() {
    let record =
        generate_rayleigh_record(80.0, 0.01, &[RayleighWave::new(2.0, 1.7, 300.0)]).unwrap();
    let with_workers = |workers| RaydecConfig {
        nwind: 4,
        workers,
        ..config(1.0, 4.0, 3)
    };
    let inline = raydec(&record, &with_workers(Some(1))).unwrap();
    for workers in [Some(2), Some(8), None] {
        let pooled = raydec(&record, &with_workers(workers)).unwrap();
        for step in 0..3 {
            for window in 0..4 {
                assert_eq!(
                    inline.ellipticity.get(step, window).to_bits(),
                    pooled.ellipticity.get(step, window).to_bits()
                );
            }
        }
    }
}

#[test]
fn test_cycle_correlations_are_retrograde() {
    let record =
        generate_rayleigh_record(600.0, 0.01, &[RayleighWave::new(1.0, 2.0, 40.0)]).unwrap();
    let ctx = AnalysisContext::new(&config(0.5, 2.0, 5), &record).unwrap();
    let tapered = TaperedWindow::new(&record.window(0, ctx.window_len));

    for &frequency in ctx.frequency_grid().frequencies() {
        let filter = design_bandpass(frequency, &ctx).unwrap();
        assert!(filter.is_stable());
        let channels = tapered.filter(&filter);
        let analyzer = CycleAnalyzer::new(frequency, &ctx);
        let counts = analyzer.for_each_cycle(&channels, |cycle| {
            assert!(
                (-1.0..=1e-9).contains(&cycle.correlation),
                "correlation {} at {} Hz",
                cycle.correlation,
                frequency
            );
            assert!((0.0..2.0 * std::f64::consts::PI).contains(&cycle.azimuth));
        });
        assert!(counts.accepted > 0, "no cycles at {} Hz", frequency);
    }
}

#[test]
fn test_invalid_configuration_rejected_before_processing() {
    let record =
        generate_rayleigh_record(10.0, 0.01, &[RayleighWave::new(2.0, 1.0, 0.0)]).unwrap();
    let bad = [
        config(4.0, 1.0, 3),
        config(1.0, 4.0, 1),
        RaydecConfig {
            cycles: 0,
            ..config(1.0, 4.0, 3)
        },
        RaydecConfig {
            dfpar: 0.0,
            ..config(1.0, 4.0, 3)
        },
        RaydecConfig {
            nwind: 0,
            ..config(1.0, 4.0, 3)
        },
    ];
    for cfg in bad {
        assert!(raydec(&record, &cfg).is_err(), "accepted {:?}", cfg);
    }
}
