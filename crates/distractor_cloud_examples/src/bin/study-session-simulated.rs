use distractor_cloud::prelude::*;
use distractor_cloud_examples::init_tracing;
use glam::{Quat, Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = StudyConfig::new()
        .with_trial_count(20)
        .with_spawn_all_groups_at_start(false)
        .with_seed(2024);
    let load = TaskLoad::High;

    let settings =
        AssetGenerationSettings::new(Vec2::ONE, PoissonDiskSampling::new(0.01)).with_seed(3);
    let assets = SamplePointAsset::generate_batch(&settings, 2)?;
    let path = StraightPath::along_x(60.0);
    let placements = PathSampleProjector::try_new(config.projection_for(load))?
        .project_seeded(&[&path], &assets, 5)?;

    let mut log = VecSink::new();
    let mut session = StudySession::new(config)?;
    let mut participant = StdRng::seed_from_u64(99);

    let mut target = session.start(placements, &mut log);
    let mut selections = 0usize;
    while target.is_some() {
        // Roughly one miss in five.
        let valid = participant.next_u32() % 5 != 0;
        selections += 1;
        target = session.submit_selection(valid, &mut log);

        if selections == 10 {
            session.record_repositioning(
                Vec3::ZERO,
                Vec3::new(0.0, 0.0, 2.0),
                Quat::IDENTITY,
                Quat::from_rotation_y(0.25),
                &mut log,
            );
        }
        if let Some(step) = session.current_step() {
            tracing::debug!(
                trial = step.trial,
                active = session.active_placements().len(),
                "Spawn window {:?}",
                step.window
            );
        }
    }

    for event in log.as_slice() {
        match event {
            StudyEvent::TargetSelected {
                timestamp,
                trial,
                group,
                position,
                ..
            } => tracing::info!(?timestamp, trial, group, ?position, "target"),
            StudyEvent::SelectionMade {
                trial, valid, ..
            } => tracing::info!(trial, valid, "selection"),
            StudyEvent::PathEndReached { end, .. } => {
                tracing::info!(end = end.value(), "path end reached")
            }
            StudyEvent::Warning {
                context, message, ..
            } => tracing::warn!(%context, "{message}"),
            other => tracing::info!(event = ?other, "event"),
        }
    }
    let misses = log.selection_outcomes().iter().filter(|valid| !**valid).count();
    tracing::info!(events = log.len(), selections, misses, "Simulation done.");

    Ok(())
}
