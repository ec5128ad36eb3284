use obbtree3d::math::{Point, Real, Vector};
use obbtree3d::shape::PolyMesh;
use oorandom::Rand64;

const CUBE_QUADS: [[u32; 4]; 6] = [
    [0, 2, 3, 1],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [2, 6, 7, 3],
    [0, 4, 6, 2],
    [1, 3, 7, 5],
];

/// A closed, outward-oriented box made of 12 triangles.
pub fn cuboid_triangles(mins: Point<Real>, maxs: Point<Real>) -> PolyMesh {
    let pts = (0..8)
        .map(|i| {
            Point::new(
                if i & 1 == 0 { mins.x } else { maxs.x },
                if i & 2 == 0 { mins.y } else { maxs.y },
                if i & 4 == 0 { mins.z } else { maxs.z },
            )
        })
        .collect();
    let tris: Vec<_> = CUBE_QUADS
        .iter()
        .flat_map(|[a, b, c, d]| [[*a, *b, *c], [*a, *c, *d]])
        .collect();

    PolyMesh::from_triangles(pts, &tris).unwrap()
}

pub fn unit_cube() -> PolyMesh {
    cuboid_triangles(Point::origin(), Point::new(1.0, 1.0, 1.0))
}

/// A closed, outward-oriented triangulated sphere.
pub fn uv_sphere(radius: Real, nlat: u32, nlon: u32) -> PolyMesh {
    let mut pts = vec![Point::new(0.0, 0.0, radius)];
    for i in 1..nlat {
        let theta = std::f64::consts::PI * i as Real / nlat as Real;
        for j in 0..nlon {
            let phi = std::f64::consts::TAU * j as Real / nlon as Real;
            pts.push(Point::from(
                Vector::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos())
                    * radius,
            ));
        }
    }
    pts.push(Point::new(0.0, 0.0, -radius));

    let ring = |i: u32, j: u32| 1 + (i - 1) * nlon + j % nlon;
    let south = pts.len() as u32 - 1;
    let mut tris = Vec::new();

    for j in 0..nlon {
        tris.push([0, ring(1, j), ring(1, j + 1)]);
        for i in 1..nlat - 1 {
            let (a, b, c, d) = (ring(i, j), ring(i + 1, j), ring(i + 1, j + 1), ring(i, j + 1));
            tris.push([a, b, c]);
            tris.push([a, c, d]);
        }
        tris.push([south, ring(nlat - 1, j + 1), ring(nlat - 1, j)]);
    }

    PolyMesh::from_triangles(pts, &tris).unwrap()
}

pub fn random_point(rng: &mut Rand64, extent: Real) -> Point<Real> {
    Point::new(
        (rng.rand_float() - 0.5) * extent,
        (rng.rand_float() - 0.5) * extent,
        (rng.rand_float() - 0.5) * extent,
    )
}

pub fn random_vector(rng: &mut Rand64, extent: Real) -> Vector<Real> {
    random_point(rng, extent).coords
}

/// A soup of `n` small random triangles scattered in a cube of side `extent`.
pub fn random_triangle_soup(rng: &mut Rand64, n: usize, extent: Real) -> PolyMesh {
    let mut pts = Vec::with_capacity(3 * n);
    let mut tris = Vec::with_capacity(n);

    for k in 0..n as u32 {
        let center = random_point(rng, extent);
        for _ in 0..3 {
            pts.push(center + random_vector(rng, 1.0));
        }
        tris.push([3 * k, 3 * k + 1, 3 * k + 2]);
    }

    PolyMesh::from_triangles(pts, &tris).unwrap()
}
