#[cfg(test)]
mod test_dataset_scenarios {
    use bayesgen::network::Network;
    use bayesgen::{DatasetGenerator, GeneratorError, GeneratorOptions};
    use std::fs;
    use std::path::Path;

    struct ParsedArff {
        relation: String,
        attributes: Vec<(String, Vec<String>)>,
        rows: Vec<Vec<String>>,
    }

    fn parse_arff(path: &Path) -> ParsedArff {
        let text = fs::read_to_string(path).unwrap();
        let mut relation = String::new();
        let mut attributes = Vec::new();
        let mut rows = Vec::new();
        let mut in_data = false;
        for line in text.lines() {
            if line.is_empty() {
                continue;
            }
            if in_data {
                rows.push(line.split(',').map(str::to_string).collect());
            } else if let Some(name) = line.strip_prefix("@relation ") {
                relation = name.to_string();
            } else if let Some(rest) = line.strip_prefix("@attribute ") {
                let (name, domain) = rest.split_once(' ').unwrap();
                let domain = domain.trim_start_matches('{').trim_end_matches('}');
                attributes.push((
                    name.to_string(),
                    domain.split(',').map(str::to_string).collect(),
                ));
            } else if line == "@data" {
                in_data = true;
            } else {
                panic!("unexpected header line: {}", line);
            }
        }
        ParsedArff {
            relation,
            attributes,
            rows,
        }
    }

    fn options(
        n_variables: i64,
        max_n_parents: i64,
        max_n_values_per_node: i64,
        n_data_points: i64,
        alpha_dirichlet: f64,
        structure_seed: i64,
    ) -> GeneratorOptions {
        GeneratorOptions {
            n_variables,
            max_n_parents,
            max_n_values_per_node,
            n_data_points,
            alpha_dirichlet,
            structure_seed,
            ..Default::default()
        }
    }

    fn assert_rows_valid(parsed: &ParsedArff, network: &Network) {
        let expected: Vec<&str> = network.iter_topological().map(|v| v.name.as_str()).collect();
        let declared: Vec<&str> = parsed.attributes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(declared, expected);
        for row in &parsed.rows {
            assert_eq!(row.len(), parsed.attributes.len());
            for (token, (_, domain)) in row.iter().zip(&parsed.attributes) {
                assert!(domain.contains(token), "{} not in {:?}", token, domain);
            }
        }
    }

    #[test]
    fn test_small_reference_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arff");
        let mut generator = DatasetGenerator::new(&options(3, 2, 2, 5, 10.0, 42)).unwrap();
        generator.generate_dataset(&path).unwrap();

        let parsed = parse_arff(&path);
        assert_eq!(parsed.relation, "data.arff");
        assert_eq!(parsed.attributes.len(), 3);
        assert_eq!(parsed.rows.len(), 5);
        for row in &parsed.rows {
            assert_eq!(row.len(), 3);
            assert!(row.iter().all(|t| t == "s0" || t == "s1"));
        }
        for (_, domain) in &parsed.attributes {
            assert_eq!(domain, &vec!["s0".to_string(), "s1".to_string()]);
        }
        assert_rows_valid(&parsed, generator.network().unwrap());
    }

    #[test]
    fn test_zero_rows_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.arff");
        let mut generator = DatasetGenerator::new(&options(4, 2, 3, 0, 1.0, 7)).unwrap();
        let summary = generator.generate_dataset(&path).unwrap();
        assert_eq!(summary.n_rows, 0);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n@data\n"));
        assert_eq!(text.matches("@attribute ").count(), 4);
        assert!(parse_arff(&path).rows.is_empty());
    }

    #[test]
    fn test_row_count_and_domains_on_larger_network() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.arff");
        let mut generator = DatasetGenerator::new(&options(30, 4, 5, 1000, 0.5, 3071980)).unwrap();
        generator.generate_dataset(&path).unwrap();

        let parsed = parse_arff(&path);
        assert_eq!(parsed.rows.len(), 1000);
        let network = generator.network().unwrap();
        assert_rows_valid(&parsed, network);
        // domains are listed in creation order
        for ((_, domain), variable) in parsed.attributes.iter().zip(network.iter_topological()) {
            assert_eq!(domain, &variable.outcomes);
        }
    }

    #[test]
    fn test_parallel_run_emits_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parallel.arff");
        let mut opts = options(10, 3, 3, 9000, 2.0, 11);
        opts.parallel = true;
        let mut generator = DatasetGenerator::new(&opts).unwrap();
        generator.generate_dataset(&path).unwrap();

        let parsed = parse_arff(&path);
        assert_eq!(parsed.rows.len(), 9000);
        assert_rows_valid(&parsed, generator.network().unwrap());
    }

    #[test]
    fn test_invalid_configuration_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("never.arff");
        for bad in [
            options(0, 2, 2, 5, 1.0, 1),
            options(3, -1, 2, 5, 1.0, 1),
            options(3, 2, 1, 5, 1.0, 1),
            options(3, 2, 2, -5, 1.0, 1),
            options(3, 2, 2, 5, 0.0, 1),
        ] {
            let result = DatasetGenerator::new(&bad).and_then(|mut g| g.generate_dataset(&path));
            assert!(matches!(result, Err(GeneratorError::InvalidConfiguration(_))));
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_unwritable_destination_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("data.arff");
        let mut generator = DatasetGenerator::new(&options(3, 1, 2, 5, 1.0, 1)).unwrap();
        let result = generator.generate_dataset(&path);
        assert!(matches!(result, Err(GeneratorError::Io { .. })));
        assert!(!path.exists());
    }
}
