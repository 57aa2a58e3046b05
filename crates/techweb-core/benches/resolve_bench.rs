//! Criterion benchmarks for the techweb engine.
//!
//! Two benchmark groups:
//! - `resolve`: ancestor closure of the deepest node and a 50-seed plan on a
//!   layered catalog of 2000 technologies
//! - `view`: filter + render view assembly over the same catalog

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use techweb_core::filter::{self, FilterSet};
use techweb_core::layout::LayoutConfig;
use techweb_core::render::graph_view;
use techweb_core::resolve::{ancestors, ancestors_of_many};
use techweb_core::test_utils::*;
use techweb_core::{Category, GraphIndex, Technology};

// ===========================================================================
// Catalog builder
// ===========================================================================

/// Build a layered catalog: `layers` tiers of `width` technologies, each
/// requiring two technologies from the tier below.
fn build_layered_catalog(layers: usize, width: usize) -> GraphIndex {
    let areas = ["particles", "biology", "industry"];
    let mut techs: Vec<Technology> = Vec::with_capacity(layers * width);
    for layer in 0..layers {
        for slot in 0..width {
            let id = format!("tech_{layer}_{slot}");
            let prereqs: Vec<String> = if layer == 0 {
                Vec::new()
            } else {
                vec![
                    format!("tech_{}_{}", layer - 1, slot),
                    format!("tech_{}_{}", layer - 1, (slot * 7 + 3) % width),
                ]
            };
            let refs: Vec<&str> = prereqs.iter().map(String::as_str).collect();
            let category = Category::ALL[slot % Category::ALL.len()];
            techs.push(tech(&id, layer as u32, category, areas[slot % areas.len()], &refs));
        }
    }
    GraphIndex::build(techs).unwrap()
}

// ===========================================================================
// Benchmarks
// ===========================================================================

fn bench_resolve(c: &mut Criterion) {
    let index = build_layered_catalog(40, 50);
    let mut group = c.benchmark_group("resolve");

    group.bench_function("ancestors_deepest", |b| {
        b.iter(|| black_box(ancestors(&index, "tech_39_0").unwrap().len()));
    });

    let seeds: Vec<String> = (0..50).map(|slot| format!("tech_39_{slot}")).collect();
    group.bench_function("ancestors_of_many_50", |b| {
        b.iter(|| black_box(ancestors_of_many(&index, &seeds).unwrap().union().len()));
    });

    group.finish();
}

fn bench_view(c: &mut Criterion) {
    let index = build_layered_catalog(40, 50);
    let layout = LayoutConfig::default();
    let mut group = c.benchmark_group("view");

    let filters = FilterSet::allow_all(&index)
        .with_categories([Category::Physics])
        .with_include_prerequisites(true);
    group.bench_function("filter_with_prerequisites", |b| {
        b.iter(|| black_box(filter::apply_all(&index, &filters).visible.len()));
    });

    let everything = FilterSet::allow_all(&index);
    group.bench_function("graph_view_all", |b| {
        b.iter(|| {
            let visible = filter::apply_all(&index, &everything);
            black_box(graph_view(&visible.visible, &layout).edges.len())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resolve, bench_view);
criterion_main!(benches);
