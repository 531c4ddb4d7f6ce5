use criterion::{BatchSize, BenchmarkId, Criterion};

use batchcore::server::{AllocationRegistry, CoreRef, RegistryData};
use batchcore::scheduler::{FifoScheduler, Scheduler};
use chrono::Utc;

use crate::utils::{create_cluster, create_jobs};

fn bench_serialize(c: &mut Criterion) {
    for node_count in [16, 1024, 8192] {
        let (cluster, partition) = create_cluster(node_count);
        let scheduler = FifoScheduler::new(CoreRef::new());
        let jobs = create_jobs(&partition, node_count, 1);
        for job in &jobs {
            scheduler.add_job(job.clone());
        }
        scheduler.allocate_jobs_at(Utc::now());
        let data: RegistryData = scheduler.core().get().registry().serializable_data();

        c.bench_with_input(
            BenchmarkId::new("serializable data", node_count),
            &node_count,
            |b, _| {
                b.iter(|| scheduler.core().get().registry().serializable_data());
            },
        );
        c.bench_with_input(
            BenchmarkId::new("load registry", node_count),
            &node_count,
            |b, _| {
                b.iter_batched(
                    || data.clone(),
                    |data| {
                        AllocationRegistry::load(&data, &cluster, |job_id| {
                            jobs.get(job_id.as_num() as usize - 1).cloned()
                        })
                        .unwrap()
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

pub fn benchmark(c: &mut Criterion) {
    bench_serialize(c);
}
