use cems_chart::core::{BufferPolicy, Sample, SampleBuffer};
use proptest::prelude::*;

fn arb_samples() -> impl Strategy<Value = Vec<Sample>> {
    prop::collection::vec((0i64..600_000, -50.0f64..500.0), 0..400)
        .prop_map(|raw| raw.into_iter().map(|(t, y)| Sample::new(t, y)).collect())
}

proptest! {
    #[test]
    fn prune_is_idempotent(
        points in arb_samples(),
        now_ms in 0i64..700_000,
        window_ms in 1i64..400_000,
        max_points in 2usize..200
    ) {
        let mut buffer = SampleBuffer::with_samples(BufferPolicy::default(), points);
        let once = buffer.prune(now_ms, window_ms, max_points).to_vec();
        let twice = buffer.prune(now_ms, window_ms, max_points).to_vec();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prune_output_is_strictly_time_ordered_and_bounded(
        points in arb_samples(),
        now_ms in 0i64..700_000,
        window_ms in 1i64..400_000,
        max_points in 2usize..200
    ) {
        let policy = BufferPolicy::default();
        let mut buffer = SampleBuffer::with_samples(policy, points);
        let kept = buffer.prune(now_ms, window_ms, max_points).to_vec();

        prop_assert!(kept.windows(2).all(|pair| pair[0].t < pair[1].t));
        prop_assert!(kept.len() <= max_points.max(policy.rescue_points));
        prop_assert!(kept.len() <= policy.hard_cap);
    }

    #[test]
    fn prune_keeps_only_window_unless_rescuing(
        points in arb_samples(),
        now_ms in 0i64..700_000,
        window_ms in 1i64..400_000
    ) {
        let mut buffer = SampleBuffer::with_samples(BufferPolicy::default(), points);
        let kept = buffer.prune(now_ms, window_ms, 10_000).to_vec();
        let cutoff = now_ms - window_ms;
        let in_window = kept.iter().filter(|sample| sample.t >= cutoff).count();

        prop_assert!(in_window == kept.len() || in_window < 2);
    }

    #[test]
    fn append_never_breaks_ordering(
        points in prop::collection::vec((0i64..100_000, -10.0f64..10.0), 0..300),
        min_step_ms in 0i64..10_000
    ) {
        let policy = BufferPolicy { min_step_ms, ..BufferPolicy::default() };
        let mut buffer = SampleBuffer::new(policy);
        for (t, y) in points {
            buffer.append(Sample::new(t, y));
        }
        let all = buffer.all();
        prop_assert!(all.windows(2).all(|pair| pair[0].t < pair[1].t));
        prop_assert!(all.len() <= policy.hard_cap);
    }
}
