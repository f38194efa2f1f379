//! Benchmarks for mesh construction, quad conversion and simplification.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use nalgebra::Point3;
use quadmesh::algo::quadrangulate::{tri_to_quad, QuadOptions};
use quadmesh::algo::simplify::{simplify_quads, SimplifyOptions};
use quadmesh::prelude::*;

fn grid_data(n: usize) -> (Vec<Point3<f64>>, Vec<[usize; 3]>) {
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    let mut faces = Vec::with_capacity(n * n * 2);

    for j in 0..=n {
        for i in 0..=n {
            // Slight wave so that scores and diagonals are not all tied
            let z = 0.1 * ((i as f64) * 0.7).sin() * ((j as f64) * 0.3).cos();
            vertices.push(Point3::new(i as f64, j as f64, z));
        }
    }

    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    (vertices, faces)
}

fn create_grid_mesh(n: usize) -> HalfEdgeMesh {
    let (vertices, faces) = grid_data(n);
    build_from_triangles(&vertices, &faces).unwrap()
}

fn bench_mesh_construction(c: &mut Criterion) {
    let (vertices, faces) = grid_data(50);

    c.bench_function("build_grid_50x50", |b| {
        b.iter(|| {
            let mesh: HalfEdgeMesh = build_from_triangles(&vertices, &faces).unwrap();
            mesh
        });
    });

    let mesh = create_grid_mesh(50);
    c.bench_function("check_correctness_50x50", |b| {
        b.iter(|| mesh.check_correctness().is_ok());
    });
}

fn bench_tri_to_quad(c: &mut Criterion) {
    let mesh = create_grid_mesh(50);

    for (name, options) in [
        ("tri_to_quad_parallel", QuadOptions::new()),
        ("tri_to_quad_sequential", QuadOptions::new().sequential()),
    ] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || mesh.clone(),
                |mut m| tri_to_quad(&mut m, &options).unwrap(),
                BatchSize::LargeInput,
            );
        });
    }
}

fn bench_simplify(c: &mut Criterion) {
    let mut quads = create_grid_mesh(50);
    tri_to_quad(&mut quads, &QuadOptions::new()).unwrap();

    for (name, options) in [
        ("simplify_half_parallel", SimplifyOptions::with_target_ratio(0.5)),
        (
            "simplify_half_sequential",
            SimplifyOptions::with_target_ratio(0.5).sequential(),
        ),
    ] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || quads.clone(),
                |mut m| simplify_quads(&mut m, &options).unwrap(),
                BatchSize::LargeInput,
            );
        });
    }
}

criterion_group!(benches, bench_mesh_construction, bench_tri_to_quad, bench_simplify);
criterion_main!(benches);
