use criterion::{Criterion, black_box, criterion_group, criterion_main};
use patlock_core::{
    Cell, DisplayMode, GridGeometry, Insets, PatternLock, PointPx, VisitedGrid, hit_cell,
};

const SAMPLES_PER_SEGMENT: usize = 32;

/// Snake path visiting all nine cells, densely sampled like a real drag.
fn snake_points(geom: &GridGeometry) -> Vec<PointPx> {
    let order: [(u8, u8); 9] = [
        (0, 0),
        (0, 1),
        (0, 2),
        (1, 2),
        (1, 1),
        (1, 0),
        (2, 0),
        (2, 1),
        (2, 2),
    ];
    let centers: Vec<PointPx> = order
        .iter()
        .map(|&(row, col)| geom.center(Cell::new_unchecked(row, col)))
        .collect();

    let mut points = vec![centers[0]];
    for pair in centers.windows(2) {
        for step in 1..=SAMPLES_PER_SEGMENT {
            let t = step as f32 / SAMPLES_PER_SEGMENT as f32;
            points.push(pair[0].lerp(pair[1], t));
        }
    }
    points
}

fn bench_full_drag(c: &mut Criterion) {
    let geom = GridGeometry::new(300.0, 300.0, Insets::default());
    let points = snake_points(&geom);

    c.bench_function("snake_drag_all_cells", |b| {
        b.iter(|| {
            let mut lock = PatternLock::new(geom);
            lock.touch_down(0, points[0]);
            for (batch, chunk) in points[1..].chunks(4).enumerate() {
                black_box(lock.touch_move(batch as u64, chunk));
            }
            black_box(lock.touch_up(1_000))
        })
    });
}

fn bench_hit_sweep(c: &mut Criterion) {
    let geom = GridGeometry::new(300.0, 300.0, Insets::default());
    let visited = VisitedGrid::default();

    c.bench_function("hit_test_scanline", |b| {
        b.iter(|| {
            let mut hits = 0u32;
            for i in 0..300 {
                let point = PointPx::new(i as f32, 150.0);
                if hit_cell(&geom, 0.41, &visited, black_box(point)).is_some() {
                    hits += 1;
                }
            }
            black_box(hits)
        })
    });
}

fn bench_error_frames(c: &mut Criterion) {
    let geom = GridGeometry::new(300.0, 300.0, Insets::default());
    let cells: Vec<Cell> = (0u8..9).map(Cell::from_index_unchecked).collect();

    c.bench_function("wrong_pattern_frame_loop", |b| {
        b.iter(|| {
            let mut lock = PatternLock::new(geom);
            lock.set_pattern(DisplayMode::Wrong, &cells, 0).unwrap();
            for now in (0..2_250).step_by(16) {
                lock.tick(now);
                black_box(lock.frame(now));
            }
        })
    });
}

criterion_group!(benches, bench_full_drag, bench_hit_sweep, bench_error_frames);
criterion_main!(benches);
