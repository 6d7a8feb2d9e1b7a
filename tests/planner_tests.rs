use pathfinder_app::domains::path_planning::*;

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    Polygon::new(vec![
        Point2D::new(x0, y0),
        Point2D::new(x1, y0),
        Point2D::new(x1, y1),
        Point2D::new(x0, y1),
    ])
    .unwrap()
}

fn dense_params() -> RoadmapParams {
    RoadmapParams {
        samples: 300,
        neighbors: 10,
        max_edge_length: 40.0,
        seed: 42,
    }
}

#[cfg(test)]
mod shortcut_tests {
    use super::*;

    #[test]
    fn test_clear_line_returns_start_and_goal_only() {
        let map = FieldMap::new(100.0, 100.0, ObstacleSet::default()).unwrap();
        let roadmap = Roadmap::build(&map, &dense_params());
        let planner = AStarPlanner::new(&roadmap, &map.obstacles, 40.0);

        let start = Point2D::new(5.0, 5.0);
        let goal = Point2D::new(95.0, 80.0);
        let outcome = planner.plan(PlanRequest { start, goal });

        assert_eq!(outcome, PlanOutcome::Direct(vec![start, goal]));
    }

    #[test]
    fn test_shortcut_ignores_an_empty_roadmap() {
        let map = FieldMap::new(100.0, 100.0, ObstacleSet::default()).unwrap();
        let roadmap = Roadmap::connect(Vec::new(), &dense_params(), &map.obstacles);
        let planner = AStarPlanner::new(&roadmap, &map.obstacles, 40.0);

        let outcome = planner.plan(PlanRequest {
            start: Point2D::new(1.0, 1.0),
            goal: Point2D::new(2.0, 2.0),
        });
        assert_eq!(outcome.waypoints().len(), 2);
    }
}

#[cfg(test)]
mod search_tests {
    use super::*;

    #[test]
    fn test_path_around_central_block_is_collision_free() {
        let map = FieldMap::new(100.0, 100.0, ObstacleSet::new(vec![rect(40.0, 40.0, 60.0, 60.0)])).unwrap();
        let roadmap = Roadmap::build(&map, &dense_params());
        let planner = AStarPlanner::new(&roadmap, &map.obstacles, 40.0);

        let start = Point2D::new(10.0, 50.0);
        let goal = Point2D::new(90.0, 50.0);
        assert!(edge_blocked(&start, &goal, &map.obstacles));

        let outcome = planner.plan(PlanRequest { start, goal });
        assert!(matches!(outcome, PlanOutcome::Searched { .. }));

        let waypoints = outcome.waypoints();
        assert!(waypoints.len() > 2);
        assert_eq!(waypoints.first(), Some(&start));
        assert_eq!(waypoints.last(), Some(&goal));
        for pair in waypoints.windows(2) {
            assert!(
                !edge_blocked(&pair[0], &pair[1], &map.obstacles),
                "leg {:?} -> {:?} collides",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_finds_shortest_route_over_a_wall() {
        // wall from the floor up to y = 80; the only way round is over the top
        let obstacles = ObstacleSet::new(vec![rect(40.0, 0.0, 60.0, 80.0)]);
        let params = RoadmapParams {
            samples: 3,
            neighbors: 5,
            max_edge_length: 100.0,
            seed: 0,
        };
        let roadmap = Roadmap::connect(
            vec![Point2D::new(30.0, 90.0), Point2D::new(70.0, 90.0), Point2D::new(50.0, 95.0)],
            &params,
            &obstacles,
        );
        let planner = AStarPlanner::new(&roadmap, &obstacles, 100.0);

        let start = Point2D::new(20.0, 20.0);
        let goal = Point2D::new(80.0, 20.0);
        let outcome = planner.plan(PlanRequest { start, goal });

        assert_eq!(
            outcome.into_waypoints(),
            vec![start, Point2D::new(30.0, 90.0), Point2D::new(70.0, 90.0), goal]
        );
    }

    #[test]
    fn test_goal_inside_closed_ring_has_no_path() {
        let ring = vec![
            rect(38.0, 38.0, 42.0, 62.0),
            rect(58.0, 38.0, 62.0, 62.0),
            rect(38.0, 38.0, 62.0, 42.0),
            rect(38.0, 58.0, 62.0, 62.0),
        ];
        let map = FieldMap::new(100.0, 100.0, ObstacleSet::new(ring)).unwrap();
        let roadmap = Roadmap::build(&map, &dense_params());
        let planner = AStarPlanner::new(&roadmap, &map.obstacles, 40.0);

        let outcome = planner.plan(PlanRequest {
            start: Point2D::new(10.0, 10.0),
            goal: Point2D::new(50.0, 50.0),
        });

        assert!(matches!(outcome, PlanOutcome::NoPath { .. }));
        assert!(!outcome.is_found());
        assert!(outcome.into_waypoints().is_empty());
    }

    #[test]
    fn test_start_inside_obstacle_has_no_path() {
        let map = FieldMap::new(100.0, 100.0, ObstacleSet::new(vec![rect(40.0, 40.0, 60.0, 60.0)])).unwrap();
        let roadmap = Roadmap::build(&map, &dense_params());
        let planner = AStarPlanner::new(&roadmap, &map.obstacles, 40.0);

        let outcome = planner.plan(PlanRequest {
            start: Point2D::new(50.0, 50.0),
            goal: Point2D::new(90.0, 90.0),
        });
        assert_eq!(outcome.waypoints(), &[] as &[Point2D]);
    }

    #[test]
    fn test_planning_does_not_mutate_roadmap() {
        let map = FieldMap::new(100.0, 100.0, ObstacleSet::new(vec![rect(40.0, 40.0, 60.0, 60.0)])).unwrap();
        let roadmap = Roadmap::build(&map, &dense_params());
        let nodes_before = roadmap.points();
        let edges_before = roadmap.edges();

        let planner = AStarPlanner::new(&roadmap, &map.obstacles, 40.0);
        for _ in 0..3 {
            planner.plan(PlanRequest {
                start: Point2D::new(10.0, 50.0),
                goal: Point2D::new(90.0, 50.0),
            });
        }

        assert_eq!(roadmap.points(), nodes_before);
        assert_eq!(roadmap.edges(), edges_before);
    }

    #[test]
    fn test_equal_cost_routes_resolve_in_queue_order() {
        // symmetric diamond around a wall: over and under cost exactly the same
        let obstacles = ObstacleSet::new(vec![rect(45.0, 30.0, 55.0, 70.0)]);
        let over = Point2D::new(50.0, 80.0);
        let under = Point2D::new(50.0, 20.0);
        let params = RoadmapParams {
            samples: 2,
            neighbors: 1,
            max_edge_length: 100.0,
            seed: 0,
        };
        let roadmap = Roadmap::connect(vec![over, under], &params, &obstacles);
        assert_eq!(roadmap.edge_count(), 0);
        let planner = AStarPlanner::new(&roadmap, &obstacles, 100.0);

        let start = Point2D::new(0.0, 50.0);
        let goal = Point2D::new(100.0, 50.0);
        let outcome = planner.plan(PlanRequest { start, goal });

        // the start node lists its most recently connected neighbor first, so
        // `under` enters the open set before `over` and wins the tie
        assert_eq!(outcome.into_waypoints(), vec![start, under, goal]);
    }
}
