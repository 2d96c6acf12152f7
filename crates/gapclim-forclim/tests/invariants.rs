//! Invariant tests for the ForClim drivers.
//!
//! These tests verify properties that must hold for any input:
//! - Soil moisture stays inside the bucket
//! - Drought indices stay in [0, 1]
//! - Identical draws give identical drivers

use approx::assert_relative_eq;
use gapclim_core::sampler::{ReplayNormalSource, RngNormalSource, StandardNormalSource};
use gapclim_core::series::{Month, MonthlySeries, SeasonEnd};
use gapclim_forclim::annual::AnnualDrivers;
use gapclim_forclim::development::{degree_days_season, DegreeDayCalculator};
use gapclim_forclim::parameters::{DegreeDayParameters, MonthlyClimateNormal, SiteWaterParameters};
use gapclim_forclim::site::{Site, SiteConfig};
use gapclim_forclim::water::{HeatIndexTerms, SoilBucketState, WaterBalance};
use gapclim_forclim::weather::{MonthlyWeather, WeatherGenerator};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn alpine_normals() -> MonthlySeries<MonthlyClimateNormal> {
    let temperature = [
        -6.5, -5.8, -2.9, 0.6, 5.2, 8.4, 10.9, 10.6, 7.9, 4.2, -1.4, -4.9,
    ];
    MonthlySeries::from_fn(|m| {
        MonthlyClimateNormal::from_std_devs(temperature[m.index()], 2.2, 2.1, 0.45, -0.35)
    })
}

mod water_balance_invariants {
    use super::*;

    /// Soil moisture stays in [0, bucket] and drought in [0, 1] for random
    /// parameters, states and weather.
    #[test]
    fn test_randomized_trials_respect_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for trial in 0..10_000 {
            let parameters = SiteWaterParameters {
                bucket_size: rng.gen_range(0.5..40.0),
                max_saturated_evapotranspiration: rng.gen_range(0.0..20.0),
                interception_fraction: rng.gen_range(0.0..=1.0),
                ..Default::default()
            };
            let model = WaterBalance::from_parameters("random", parameters.clone()).unwrap();
            let mut state =
                SoilBucketState::new(rng.gen_range(0.0..=1.0) * parameters.bucket_size);
            let weather = MonthlyWeather {
                temperature: MonthlySeries::from_fn(|_| rng.gen_range(-25.0..35.0)),
                precipitation: MonthlySeries::from_fn(|_| rng.gen_range(0.0..50.0)),
            };

            let summary = model.solve_year(&mut state, &weather);

            for month in Month::ALL {
                let sm = summary.soil_moisture[month];
                let drought = summary.drought_index[month];
                assert!(
                    (0.0..=parameters.bucket_size).contains(&sm),
                    "trial {}: {} soil moisture {} outside [0, {}]",
                    trial,
                    month,
                    sm,
                    parameters.bucket_size
                );
                assert!(
                    (0.0..=1.0).contains(&drought),
                    "trial {}: {} drought index {}",
                    trial,
                    month,
                    drought
                );
            }
            assert!((0.0..=1.0).contains(&summary.annual_drought_index));
            assert!(summary.annual_evapotranspiration >= 0.0);
        }
    }

    /// A full 10 cm bucket without rain under high demand only ever dries out.
    #[test]
    fn test_dry_down_is_monotone() {
        let model = WaterBalance::from_parameters(
            "dry",
            SiteWaterParameters {
                bucket_size: 10.0,
                ..Default::default()
            },
        )
        .unwrap();
        let mut state = SoilBucketState::new(10.0);
        let terms = HeatIndexTerms {
            heat_index: 20.0,
            exponent: 1.5,
        };

        let mut previous = state.soil_moisture;
        for month in 0..120 {
            let step = model.solve_month(&mut state, 25.0, 0.0, terms);
            assert!(
                step.potential_evapotranspiration > step.supply,
                "month {}: PET {} must exceed supply {}",
                month,
                step.potential_evapotranspiration,
                step.supply
            );
            assert!(state.soil_moisture <= previous);
            assert!(state.soil_moisture >= 0.0);
            previous = state.soil_moisture;
        }
        assert!(state.soil_moisture < 1e-3);
    }

    /// Identical inputs give bit-identical outputs.
    #[test]
    fn test_water_balance_is_deterministic() {
        let model = WaterBalance::from_parameters("s", SiteWaterParameters::default()).unwrap();
        let generator = WeatherGenerator::new(alpine_normals());
        let weather =
            generator.simulate_year(&mut RngNormalSource::new(ChaCha8Rng::seed_from_u64(5)));

        let a = model.solve_year(&mut SoilBucketState::new(14.0), &weather);
        let b = model.solve_year(&mut SoilBucketState::new(14.0), &weather);
        assert_eq!(a, b);
    }
}

mod season_boundaries {
    use super::*;

    fn spike(months: &[Month], value: f64) -> MonthlySeries<f64> {
        let mut series = MonthlySeries::filled(0.0);
        for &m in months {
            series[m] = value;
        }
        series
    }

    /// Water season bounds 3..9: April always counts, October only when inclusive.
    #[test]
    fn test_water_season_boundary_months() {
        let weather = MonthlyWeather {
            temperature: spike(&[Month::April, Month::October], 12.0),
            precipitation: MonthlySeries::filled(0.0),
        };

        for convention in [SeasonEnd::Exclusive, SeasonEnd::Inclusive] {
            let model = WaterBalance::from_parameters(
                "s",
                SiteWaterParameters {
                    active_season_convention: convention,
                    ..Default::default()
                },
            )
            .unwrap();
            let summary = model.solve_year(&mut SoilBucketState::new(20.0), &weather);
            let april = summary.evapotranspiration[Month::April];
            let october = summary.evapotranspiration[Month::October];
            assert!(april > 0.0 && october > 0.0);

            let expected = match convention {
                SeasonEnd::Exclusive => april,
                SeasonEnd::Inclusive => april + october,
            };
            assert_relative_eq!(summary.annual_evapotranspiration, expected, epsilon = 1e-12);
        }
    }

    /// Degree-day season bounds 3..8: April always counts, September only when inclusive.
    #[test]
    fn test_degree_day_season_boundary_months() {
        let temperature = spike(&[Month::April, Month::September], 10.0);

        for convention in [SeasonEnd::Inclusive, SeasonEnd::Exclusive] {
            let calculator = DegreeDayCalculator::from_parameters(
                "s",
                DegreeDayParameters {
                    season_convention: convention,
                    ..Default::default()
                },
            )
            .unwrap();
            let summary = calculator.summarise(&temperature);
            let april = summary.monthly[Month::April];
            let september = summary.monthly[Month::September];

            let expected = match convention {
                SeasonEnd::Inclusive => april + september,
                SeasonEnd::Exclusive => april,
            };
            assert_relative_eq!(summary.season, expected, epsilon = 1e-12);
            assert_eq!(
                summary.season,
                degree_days_season(&temperature, 5.5, 30.0, calculator.season())
            );
        }
    }
}

mod perfect_correlation {
    use super::*;

    /// Months with |correlation| = 1, some pushed to the edge of the
    /// validation tolerance, still simulate finite drivers.
    #[test]
    fn test_validated_singular_covariance_simulates_finite_years() {
        let normals = MonthlySeries::from_fn(|m| {
            let temperature = [
                -2.0, -0.5, 3.5, 7.5, 12.0, 15.5, 17.5, 17.0, 13.5, 8.5, 3.5, 0.0,
            ][m.index()];
            let correlation = if m.index() % 2 == 0 { 1.0 } else { -1.0 };
            let mut normal =
                MonthlyClimateNormal::from_std_devs(temperature, 2.0, 2.0, 0.037, correlation);
            if m.index() % 3 == 0 {
                normal.covariance *= 1.0 + 4e-10;
            }
            normal
        });
        let site = Site::from_config(SiteConfig::new("ridge", normals)).unwrap();
        let drivers = AnnualDrivers::new(site);

        for seed in 0..20 {
            let mut state = drivers.initial_state();
            let mut source = RngNormalSource::new(ChaCha8Rng::seed_from_u64(seed));
            for climate in drivers.simulate_years(2000, 5, &mut state, &mut source) {
                for month in Month::ALL {
                    let t = climate.weather.temperature[month];
                    let p = climate.weather.precipitation[month];
                    assert!(t.is_finite(), "seed {}: {} temperature {}", seed, month, t);
                    assert!(
                        p.is_finite() && p >= 0.0,
                        "seed {}: {} precipitation {}",
                        seed,
                        month,
                        p
                    );
                    assert!(climate.water.soil_moisture[month].is_finite());
                    assert!(climate.water.drought_index[month].is_finite());
                }
                assert!(climate.degree_days.annual.is_finite());
                assert!(climate.degree_days.season.is_finite());
                assert!(climate.water.annual_evapotranspiration.is_finite());
                assert!(climate.water.annual_drought_index.is_finite());
            }
            assert!(state.soil_moisture.is_finite());
        }
    }
}

mod determinism {
    use super::*;

    fn drivers() -> AnnualDrivers {
        AnnualDrivers::new(Site::from_config(SiteConfig::new("alp", alpine_normals())).unwrap())
    }

    #[test]
    fn test_replayed_draws_reproduce_a_run() {
        let drivers = drivers();

        // Record the draws of a seeded run
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let mut recorder = RngNormalSource::new(&mut rng);
        let draws: Vec<f64> = (0..48).map(|_| recorder.next_standard_normal()).collect();

        let mut seeded = RngNormalSource::new(ChaCha8Rng::seed_from_u64(77));
        let mut replay = ReplayNormalSource::new(draws).unwrap();

        let mut state_a = drivers.initial_state();
        let mut state_b = drivers.initial_state();
        let a = drivers.simulate_years(2000, 2, &mut state_a, &mut seeded);
        let b = drivers.simulate_years(2000, 2, &mut state_b, &mut replay);

        assert_eq!(a, b);
        assert_eq!(state_a, state_b);
    }

    #[test]
    fn test_replicates_in_threads_match_sequential_runs() {
        let drivers = drivers();
        let run = |seed: u64| {
            let mut state = drivers.initial_state();
            let mut source = RngNormalSource::new(ChaCha8Rng::seed_from_u64(seed));
            drivers.simulate_years(1950, 10, &mut state, &mut source)
        };

        let sequential: Vec<_> = (0..4).map(run).collect();
        let parallel: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4).map(|seed| scope.spawn(move || run(seed))).collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("replicate thread panicked"))
                .collect()
        });

        assert_eq!(sequential, parallel);
    }
}
