//! End-to-end scenarios: the reference index shapes and a full harness run
//! over generated datasets.

#![expect(clippy::unwrap_used, reason = "fail fast in tests")]

mod common;

use lindex::bptree::Node;
use lindex::harness::report::{BUILD_FILE, LOOKUP_FILE};
use lindex::harness::{BenchConfig, DatasetSpec, run, sanity_check, write_keys};
use lindex::{PointIndex, Rmi, StaticBPTree};

// ============================================================================
//  Index Shapes
// ============================================================================

#[test]
fn two_leaf_tree() {
    common::init_tracing();
    let keys = [10, 20, 30, 40, 50, 60, 70, 80];
    let mut tree = StaticBPTree::new(4).unwrap();
    tree.bulk_load(&keys);

    assert_eq!(tree.leaf_count(), 2);
    assert_eq!(tree.height(), 2);
    let Node::Internal(root) = tree.node(tree.root().unwrap()) else {
        panic!("root should be internal");
    };
    assert_eq!(root.split_keys, vec![50]);
    assert_eq!(tree.node(root.children[0]).as_leaf().unwrap().keys, vec![10, 20, 30, 40]);
    assert_eq!(tree.node(root.children[1]).as_leaf().unwrap().keys, vec![50, 60, 70, 80]);

    assert_eq!(tree.search(60), Some(5));
    assert_eq!(tree.search(45), None);
}

#[test]
fn linear_rmi_ten_leaves() {
    common::init_tracing();
    let keys: Vec<u64> = (0..1000).collect();
    let mut rmi = Rmi::new(10).unwrap();
    rmi.train(&keys).unwrap();

    let mut covered = 0;
    let mut next_start = 0;
    for leaf in rmi.leaves() {
        assert!(!leaf.is_empty());
        assert_eq!(leaf.segment_start, next_start);
        next_start = leaf.segment_end;
        covered += leaf.segment_len();
        assert!(leaf.max_error <= 1, "max_error {}", leaf.max_error);
    }
    assert_eq!(covered, 1000);
    assert_eq!(rmi.search(&keys, 500), Some(500));
}

#[test]
fn both_indexes_agree() {
    common::init_tracing();
    let keys = common::quadratic_keys(20_000);
    let mut tree = StaticBPTree::new(32).unwrap();
    tree.bulk_load(&keys);
    let mut rmi = Rmi::new(256).unwrap();
    rmi.train(&keys).unwrap();

    let indexes: [&dyn PointIndex; 2] = [&tree, &rmi];
    for probe in keys.iter().step_by(13).flat_map(|&k| [k, k + 1]) {
        let expected = keys.binary_search(&probe).ok();
        for index in indexes {
            assert_eq!(index.lookup(&keys, probe), expected, "{} on {probe}", index.name());
        }
    }
    assert!(sanity_check(&keys, &indexes, 123).passed());
}

// ============================================================================
//  Harness
// ============================================================================

#[test]
fn harness_run_writes_reports() {
    common::init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let data_dir = dir.path().join("data");
    let output_dir = dir.path().join("out");
    std::fs::create_dir_all(&data_dir).unwrap();

    write_keys(&data_dir.join("linear_u64"), &common::linear_keys(4_000, 1, 10)).unwrap();
    write_keys(&data_dir.join("skewed_u64"), &common::quadratic_keys(3_000)).unwrap();

    let config = BenchConfig {
        data_dir,
        output_dir: output_dir.clone(),
        datasets: vec![
            DatasetSpec::new("linear", "linear_u64").with_leaves(&[8, 32]),
            DatasetSpec::new("missing", "does_not_exist"),
            DatasetSpec::new("skewed", "skewed_u64"),
        ],
        max_keys: 2_500,
        num_queries: 500,
        bpt_order: 16,
        ..Default::default()
    };

    let summary = run(&config).unwrap();

    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].0, "missing");

    // linear: tree + 2 RMIs, skewed: tree + 1 RMI.
    assert_eq!(summary.results.len(), 5);
    assert!(summary.results.iter().all(|r| r.num_keys == 2_500));
    for result in &summary.results {
        match result.index {
            "BPTree" => assert!(result.num_leaves.is_none() && result.sanity.is_none()),
            "RMI" => assert!(result.sanity.unwrap().passed()),
            other => panic!("unexpected index {other}"),
        }
    }

    let lookup = std::fs::read_to_string(output_dir.join(LOOKUP_FILE)).unwrap();
    let lines: Vec<&str> = lookup.lines().collect();
    assert_eq!(lines[0], "dataset,index,num_keys,num_leaves,metric,mean_ns,p95_ns,p99_ns");
    assert_eq!(lines.len(), 6);
    assert!(lines[1].starts_with("linear,BPTree,2500,,lookup,"));
    assert!(lines[2].starts_with("linear,RMI,2500,8,lookup,"));
    assert!(lines[3].starts_with("linear,RMI,2500,32,lookup,"));
    assert!(lines[5].starts_with("skewed,RMI,2500,64,lookup,"));

    let build = std::fs::read_to_string(output_dir.join(BUILD_FILE)).unwrap();
    let lines: Vec<&str> = build.lines().collect();
    assert_eq!(lines[0], "dataset,index,num_keys,num_leaves,build_time_s,mem_bytes");
    assert_eq!(lines.len(), 6);
    assert!(lines[4].starts_with("skewed,BPTree,2500,,"));
}

#[test]
fn harness_rejects_invalid_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = BenchConfig {
        output_dir: dir.path().to_path_buf(),
        bpt_order: 2,
        ..Default::default()
    };
    assert!(run(&config).is_err());
}
