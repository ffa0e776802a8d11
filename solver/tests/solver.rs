use quilt::prelude::*;
use quilt::solver::search::packing::BottomLeftPacking;
use std::time::Duration;

type Model = quilt::model::Model<String>;

/// `n` squares of side in `[1, max]` that must tile a `w × h` container.
fn tiling_model(w: IntCst, h: IntCst, n: usize) -> (Model, Vec<IntervalVar>, Vec<IntervalVar>) {
    let mut model = Model::new();
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut areas = Vec::new();
    for i in 0..n {
        let size = model.new_ivar(1, w.min(h), format!("size_{i}"));
        let sx = model.new_ivar(0, w, format!("sx_{i}"));
        let ex = model.new_ivar(0, w, format!("ex_{i}"));
        let sy = model.new_ivar(0, h, format!("sy_{i}"));
        let ey = model.new_ivar(0, h, format!("ey_{i}"));
        let area = model.new_ivar(1, w * h, format!("area_{i}"));
        model.add_mul(area, size, size);
        xs.push(model.new_interval(sx, size, ex, format!("ix_{i}")));
        ys.push(model.new_interval(sy, size, ey, format!("iy_{i}")));
        areas.push(area);
    }
    model.enforce(NoOverlap2D::new(xs.clone(), ys.clone()));
    model.add_sum_eq(areas, w * h);
    (model, xs, ys)
}

fn solve(model: Model, xs: &[IntervalVar], ys: &[IntervalVar], w: IntCst, h: IntCst, packing: bool) -> SolveResponse {
    let mut solver = Solver::new(model);
    if packing {
        solver.set_brancher(BottomLeftPacking::new(w, h, xs.iter().copied(), ys.iter().copied()));
    }
    solver.solve(&SolverParams::default())
}

#[test]
fn three_by_two_needs_three_squares() {
    for packing in [true, false] {
        let (model, xs, ys) = tiling_model(3, 2, 2);
        assert_eq!(solve(model, &xs, &ys, 3, 2, packing).status, SolveStatus::Infeasible);

        let (model, xs, ys) = tiling_model(3, 2, 3);
        let response = solve(model, &xs, &ys, 3, 2, packing);
        assert_eq!(response.status, SolveStatus::Feasible);
        let total: IntCst = xs.iter().map(|x| response.value(x.size).unwrap().pow(2)).sum();
        assert_eq!(total, 6);
        for (x, y) in xs.iter().zip(&ys) {
            assert!(response.value(x.end).unwrap() <= 3);
            assert!(response.value(y.end).unwrap() <= 2);
        }
    }
}

#[test]
fn empty_domain_is_model_invalid() {
    let mut model = Model::new();
    let x = model.new_ivar(0, 10, "x");
    let y = model.new_ivar(5, 4, "y");
    model.enforce(linear::leq(x, y));
    let response = Solver::new(model).solve(&SolverParams::default());
    assert_eq!(response.status, SolveStatus::ModelInvalid);
    assert_eq!(response.status_name(), "MODEL_INVALID");
    assert!(response.solution.is_none());
}

#[test]
fn zero_time_limit_is_unknown() {
    let (model, xs, ys) = tiling_model(5, 3, 4);
    let mut solver = Solver::new(model);
    solver.set_brancher(BottomLeftPacking::new(5, 3, xs, ys));
    let response = solver.solve(&SolverParams::with_time_limit(Duration::ZERO));
    assert_eq!(response.status, SolveStatus::Unknown);
    assert_eq!(response.status_name(), "UNKNOWN");
    assert_eq!(response.value(VarRef::from_u32(0)), None);
}

#[test]
fn cumulative_resource() {
    // three unit-demand tasks of length 2 on a resource of capacity 2, within a horizon of 3
    let build = |horizon: IntCst| {
        let mut model = Model::new();
        let mut intervals = Vec::new();
        let mut demands = Vec::new();
        for i in 0..3 {
            let start = model.new_ivar(0, horizon, format!("s{i}"));
            let size = model.new_ivar(2, 2, format!("d{i}"));
            let end = model.new_ivar(0, horizon, format!("e{i}"));
            intervals.push(model.new_interval(start, size, end, format!("t{i}")));
            demands.push(model.new_ivar(1, 1, format!("r{i}")));
        }
        model.enforce(Cumulative::new(intervals, demands, 2));
        model
    };
    let response = Solver::new(build(3)).solve(&SolverParams::default());
    assert_eq!(response.status, SolveStatus::Infeasible);

    let response = Solver::new(build(4)).solve(&SolverParams::default());
    assert_eq!(response.status, SolveStatus::Feasible);
    assert_eq!(response.stats.num_solutions, 1);
}
