//! Parallel sampling helpers for statistical validation of generators.
//!
//! Test assertions about a generator's output distribution need many
//! samples; collecting them across worker threads keeps large sample counts
//! cheap and doubles as a concurrency check on the sealed registry.

use std::any::Any;

use testrand::{
    ConstraintSet, GenerationConfig, GeneratorError, GeneratorRegistry, NullPolicy, create_rng,
};

/// Collect `count` unconstrained samples of `T`, generated in parallel.
pub fn collect_samples<T: Any + Send>(
    registry: &GeneratorRegistry,
    count: usize,
    config: &GenerationConfig,
) -> Result<Vec<T>, GeneratorError> {
    collect_samples_with(registry, count, &ConstraintSet::new(), config)
}

/// Collect `count` constrained samples of `T`, generated in parallel.
///
/// The registry is sealed before the workers start; every worker draws from
/// its own entropy-seeded RNG.
pub fn collect_samples_with<T: Any + Send>(
    registry: &GeneratorRegistry,
    count: usize,
    constraints: &ConstraintSet,
    config: &GenerationConfig,
) -> Result<Vec<T>, GeneratorError> {
    registry.seal();
    let workers = num_cpus::get().clamp(1, count.max(1));

    let results = crossbeam::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let share = count / workers + usize::from(worker < count % workers);
            handles.push(scope.spawn(move |_| {
                let mut rng = create_rng();
                let mut values = Vec::with_capacity(share);
                for _ in 0..share {
                    match registry.random_with::<T>(&mut rng, constraints, config) {
                        Ok(value) => values.push(value),
                        Err(err) => return Err(err),
                    }
                }
                Ok(values)
            }));
        }
        let mut all = Vec::with_capacity(count);
        for handle in handles {
            // Worker panics only propagate generator bugs; surface them.
            all.push(handle.join().expect("sampling worker panicked"));
        }
        all
    })
    .expect("sampling scope panicked"); // crossbeam::scope only fails on panic

    let mut samples = Vec::with_capacity(count);
    for result in results {
        samples.extend(result?);
    }
    Ok(samples)
}

/// Measure the fraction of `None` results `nullable_random` produces for
/// `T` under the given policy, over `count` parallel draws.
pub fn null_ratio<T: Any + Send>(
    registry: &GeneratorRegistry,
    count: usize,
    policy: &NullPolicy,
    config: &GenerationConfig,
) -> Result<f64, GeneratorError> {
    registry.seal();
    let workers = num_cpus::get().clamp(1, count.max(1));

    let results = crossbeam::scope(|scope| {
        let mut handles = Vec::with_capacity(workers);
        for worker in 0..workers {
            let share = count / workers + usize::from(worker < count % workers);
            handles.push(scope.spawn(move |_| {
                let mut rng = create_rng();
                let mut nulls = 0usize;
                for _ in 0..share {
                    match registry.nullable_random::<T>(&mut rng, policy, config) {
                        Ok(None) => nulls += 1,
                        Ok(Some(_)) => {}
                        Err(err) => return Err(err),
                    }
                }
                Ok(nulls)
            }));
        }
        let mut all = Vec::with_capacity(workers);
        for handle in handles {
            all.push(handle.join().expect("sampling worker panicked"));
        }
        all
    })
    .expect("sampling scope panicked");

    let mut nulls = 0usize;
    for result in results {
        nulls += result?;
    }
    Ok(nulls as f64 / count.max(1) as f64)
}
