use criterion::{Criterion, criterion_group, criterion_main};
use mirrormap::TreeModel;
use mirrormap::render::{MindMapConfig, RecordingSurface, RenderSession};
use std::hint::black_box;
use std::time::Duration;

const PLANS: &str = include_str!("../../../fixtures/plans.mm");

fn balanced(depth: usize, fanout: usize) -> TreeModel {
    let mut tree = TreeModel::new("root");
    let mut level = vec![tree.root()];
    for d in 0..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for i in 0..fanout {
                next.push(tree.add_child(parent, format!("n{d}-{i}")).expect("parent exists"));
            }
        }
        level = next;
    }
    tree
}

fn bench_render_cycle(c: &mut Criterion) {
    let config = MindMapConfig::new().with_duration(Duration::from_millis(500));

    let mut group = c.benchmark_group("render_cycle");
    group.sample_size(50);

    group.bench_function("import_plans", |b| {
        b.iter(|| {
            let tree = mirrormap::import_freemind_str(black_box(PLANS)).expect("fixture imports");
            black_box(tree.len());
        });
    });

    // Re-rendering an unchanged tree is the steady-state cost: everything persists.
    let mut tree = balanced(4, 5);
    let mut session = RenderSession::new(config.clone(), RecordingSurface::new());
    session.render(&mut tree).expect("render");
    group.bench_function("rerender_balanced_4x5", |b| {
        b.iter(|| {
            let rec = session.render(black_box(&mut tree)).expect("render");
            session.surface_mut().clear();
            black_box(rec.persisting().len());
        });
    });

    group.bench_function("first_render_and_settle_4x5", |b| {
        b.iter(|| {
            let mut tree = balanced(4, 5);
            let mut session = RenderSession::new(config.clone(), RecordingSurface::new());
            session.render(&mut tree).expect("render");
            for _ in 0..30 {
                session.tick(Duration::from_millis(17));
            }
            black_box(session.scene().len());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_render_cycle);
criterion_main!(benches);
