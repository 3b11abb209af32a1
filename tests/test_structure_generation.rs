#[cfg(test)]
mod test_structure_generation {
    use bayesgen::common::rng::structure_rng;
    use bayesgen::network::{StructureGenerator, generate_parameters, generate_structure};
    use std::sync::Arc;

    #[test]
    fn test_parents_precede_children_for_all_seeds() {
        for seed in -20..80 {
            let network = generate_structure(40, 5, 5, seed).unwrap();
            for (index, variable) in network.variables().iter().enumerate() {
                for &parent in &variable.parents {
                    assert!(
                        network.position(parent) < network.position(index),
                        "seed {}: {} is not before {}",
                        seed,
                        network.variable(parent).name,
                        variable.name
                    );
                }
            }
        }
    }

    #[test]
    fn test_cardinality_bounds() {
        for (max_parents, max_values) in [(0, 2), (1, 3), (3, 7), (10, 4)] {
            let network = generate_structure(25, max_parents, max_values, 7).unwrap();
            for (position, variable) in network.iter_topological().enumerate() {
                assert!(variable.outcome_count() >= 2);
                assert!(variable.outcome_count() <= max_values);
                assert!(variable.parents.len() <= position.min(max_parents));
            }
        }
    }

    #[test]
    fn test_identical_inputs_give_identical_structures() {
        let a = generate_structure(50, 4, 6, 3071980).unwrap();
        let b = generate_structure(50, 4, 6, 3071980).unwrap();
        assert_eq!(a.topological_order(), b.topological_order());
        for (va, vb) in a.variables().iter().zip(b.variables()) {
            assert_eq!(va.outcome_count(), vb.outcome_count());
            assert_eq!(va.parents, vb.parents);
        }
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_explicit_rng_threading() {
        // The seeded helper and an explicitly threaded RNG agree.
        let generator = StructureGenerator::new(12, 3, 4).unwrap();
        let threaded = generator.generate(&mut structure_rng(99)).unwrap();
        let seeded = generate_structure(12, 3, 4, 99).unwrap();
        assert_eq!(threaded, seeded);
    }

    #[test]
    fn test_no_parents_means_unconditional_cpts() {
        let network = Arc::new(generate_structure(20, 0, 5, 13).unwrap());
        assert!(network.variables().iter().all(|v| v.parents.is_empty()));
        let parametrized = generate_parameters(&network, 1.0, &mut structure_rng(13)).unwrap();
        assert!(parametrized.cpts().iter().all(|cpt| cpt.n_rows() == 1));
    }

    #[test]
    fn test_summary_has_one_entry_per_variable() {
        let network = generate_structure(6, 2, 3, 5).unwrap();
        let summary = network.to_string();
        assert!(summary.starts_with("BN with 6 nodes"));
        assert_eq!(summary.matches("\toutcomes: ").count(), 6);
        assert_eq!(summary.matches("\tparents: ").count(), 6);
        let roots = network.variables().iter().filter(|v| v.parents.is_empty()).count();
        assert_eq!(summary.matches("parents: no parents").count(), roots);
    }
}
