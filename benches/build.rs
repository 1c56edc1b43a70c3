//! Build-time benchmarks: RMI training and B+tree bulk loading.
//!
//! Run with: `cargo bench --bench build`

use divan::{Bencher, black_box};
use lindex::{Rmi, StaticBPTree};


use bench_utils::{clustered_keys, linear_keys, quadratic_keys, uniform_keys};

fn main() {
    divan::main();
}

const SIZES: [usize; 3] = [10_000, 100_000, 1_000_000];

// =============================================================================
// RMI Training
// =============================================================================

#[divan::bench_group]
mod rmi_train {
    use super::{Bencher, Rmi, black_box, clustered_keys, linear_keys, quadratic_keys, uniform_keys};

    #[divan::bench(args = super::SIZES)]
    fn linear(bencher: Bencher, n: usize) {
        let keys = linear_keys(n);
        bencher.bench_local(|| {
            let mut rmi = Rmi::default();
            rmi.train(black_box(&keys)).unwrap();
            rmi
        });
    }

    #[divan::bench(args = super::SIZES)]
    fn quadratic(bencher: Bencher, n: usize) {
        let keys = quadratic_keys(n);
        bencher.bench_local(|| {
            let mut rmi = Rmi::default();
            rmi.train(black_box(&keys)).unwrap();
            rmi
        });
    }

    #[divan::bench(args = super::SIZES)]
    fn uniform(bencher: Bencher, n: usize) {
        let keys = uniform_keys(n);
        bencher.bench_local(|| {
            let mut rmi = Rmi::default();
            rmi.train(black_box(&keys)).unwrap();
            rmi
        });
    }

    #[divan::bench(args = [32, 64, 128, 256, 1024])]
    fn leaf_sweep(bencher: Bencher, leaves: usize) {
        let keys = clustered_keys(1_000_000, 16);
        bencher.bench_local(|| {
            let mut rmi = Rmi::new(leaves).unwrap();
            rmi.train(black_box(&keys)).unwrap();
            rmi
        });
    }
}

// =============================================================================
// B+Tree Bulk Load
// =============================================================================

#[divan::bench_group]
mod bptree_load {
    use super::{Bencher, StaticBPTree, black_box, linear_keys};

    #[divan::bench(args = super::SIZES)]
    fn order_64(bencher: Bencher, n: usize) {
        let keys = linear_keys(n);
        bencher.bench_local(|| {
            let mut tree = StaticBPTree::default();
            tree.bulk_load(black_box(&keys));
            tree
        });
    }

    #[divan::bench(args = [4, 16, 64, 256])]
    fn order_sweep(bencher: Bencher, order: usize) {
        let keys = linear_keys(1_000_000);
        bencher.bench_local(|| {
            let mut tree = StaticBPTree::new(order).unwrap();
            tree.bulk_load(black_box(&keys));
            tree
        });
    }
}
