use criterion::{BatchSize, BenchmarkId, Criterion};

use batchcore::config::{SchedulerConfig, SchedulingPolicy};
use batchcore::scheduler::{NodeSelection, create_scheduler};
use batchcore::server::CoreRef;
use chrono::Utc;

use crate::utils::{create_cluster, create_jobs};

fn bench_allocate_jobs(c: &mut Criterion) {
    let policies = [
        ("fifo", SchedulingPolicy::Fifo, NodeSelection::FirstFit),
        ("backfill", SchedulingPolicy::Backfill, NodeSelection::FirstFit),
        (
            "backfill-smallest",
            SchedulingPolicy::Backfill,
            NodeSelection::SmallestFit,
        ),
    ];
    for (name, policy, node_selection) in policies {
        for job_count in [10, 1_000, 10_000] {
            for node_count in [16, 256, 1024] {
                c.bench_with_input(
                    BenchmarkId::new(
                        format!("allocate jobs ({name})"),
                        format!("jobs={job_count}, nodes={node_count}"),
                    ),
                    &(job_count, node_count),
                    |b, &(job_count, node_count)| {
                        b.iter_batched_ref(
                            || {
                                let (cluster, partition) = create_cluster(node_count);
                                let config = SchedulerConfig {
                                    policy,
                                    node_selection,
                                    ..Default::default()
                                };
                                let scheduler = create_scheduler(&config, CoreRef::new());
                                for job in create_jobs(&partition, job_count, 8) {
                                    scheduler.add_job(job);
                                }
                                (cluster, scheduler)
                            },
                            |(_cluster, scheduler)| {
                                scheduler.allocate_jobs_at(Utc::now());
                            },
                            BatchSize::SmallInput,
                        );
                    },
                );
            }
        }
    }
}

fn bench_blocked_pass(c: &mut Criterion) {
    for job_count in [1_000, 10_000] {
        c.bench_with_input(
            BenchmarkId::new("backfill pass on full cluster", job_count),
            &job_count,
            |b, &job_count| {
                b.iter_batched_ref(
                    || {
                        let (cluster, partition) = create_cluster(256);
                        let scheduler = create_scheduler(&SchedulerConfig::default(), CoreRef::new());
                        for job in create_jobs(&partition, job_count, 32) {
                            scheduler.add_job(job);
                        }
                        // The first pass fills the cluster; measured passes only find blocked jobs
                        scheduler.allocate_jobs_at(Utc::now());
                        (cluster, scheduler)
                    },
                    |(_cluster, scheduler)| {
                        scheduler.allocate_jobs_at(Utc::now());
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
}

pub fn benchmark(c: &mut Criterion) {
    bench_allocate_jobs(c);
    bench_blocked_pass(c);
}
