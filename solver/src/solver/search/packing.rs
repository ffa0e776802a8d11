use crate::core::state::Domains;
use crate::core::IntCst;
use crate::model::lang::{IVar, IntervalVar};
use crate::model::Model;
use crate::solver::search::{Branch, Decision, SearchControl};
use crate::solver::stats::Stats;
use itertools::Itertools;
use num_integer::div_ceil;
use smallvec::smallvec;

/// Boxes that may be placed at the first free cell of the container.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Candidates {
    /// Every unplaced box.
    #[default]
    All,
    /// Only the first unplaced box, in declaration order.
    ///
    /// Complete if any two boxes can be swapped in a solution, or if boxes are constrained to be
    /// placed in declaration order, from the bottom row up and from left to right.
    First,
    /// Every unplaced box, where sizes are non-decreasing in declaration order and two boxes of the
    /// same size can be swapped in a solution, except for the first box.
    ///
    /// A box is then placed with a size strictly larger than its unplaced predecessor's.
    SortedBySize,
}

/// Searches for a perfect packing of boxes into a `width × height` container, by filling
/// the container from its bottom-left corner.
///
/// At each step, the lowest then leftmost uncovered cell must be the bottom-left corner of some
/// box that is not yet placed: the brancher tries each candidate box at this position with each
/// width that fits in the free run on its right, largest first.
/// A box whose start was fixed by propagation first gets its size fixed, largest value first.
///
/// The search is only complete for packings that leave no cell uncovered, and fails early when
/// the remaining boxes are too few to cover the free cells.
#[derive(Clone, Debug)]
pub struct BottomLeftPacking {
    width: IntCst,
    height: IntCst,
    boxes: Vec<(IntervalVar, IntervalVar)>,
    candidates: Candidates,
    /// True if every box has the same size variable on both axes.
    squares: bool,
}

/// The first uncovered cell, with the number of free cells starting from it on its right and above it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct FreeCell {
    x: IntCst,
    y: IntCst,
    free_right: IntCst,
    free_above: IntCst,
}

/// Cells of the container covered by placed boxes.
struct Occupancy {
    width: usize,
    height: usize,
    covered: Vec<bool>,
    /// Number of covered cells at the bottom of each column.
    heights: Vec<usize>,
}

impl Occupancy {
    fn is_covered(&self, col: usize, row: usize) -> bool {
        self.covered[row * self.width + col]
    }

    fn free_right(&self, col: usize, row: usize) -> usize {
        (col..self.width).take_while(|&c| !self.is_covered(c, row)).count()
    }

    fn free_above(&self, col: usize, row: usize) -> usize {
        (row..self.height).take_while(|&r| !self.is_covered(col, r)).count()
    }

    /// The lowest, then leftmost, uncovered cell.
    fn first_free_cell(&self) -> Option<FreeCell> {
        let col = self.heights.iter().position_min()?;
        let row = self.heights[col];
        if row >= self.height {
            return None;
        }
        Some(FreeCell {
            x: col as IntCst,
            y: row as IntCst,
            free_right: self.free_right(col, row) as IntCst,
            free_above: self.free_above(col, row) as IntCst,
        })
    }
}

impl BottomLeftPacking {
    pub fn new(
        width: IntCst,
        height: IntCst,
        x: impl IntoIterator<Item = IntervalVar>,
        y: impl IntoIterator<Item = IntervalVar>,
    ) -> Self {
        let boxes: Vec<(IntervalVar, IntervalVar)> = x.into_iter().zip(y).collect();
        let squares = boxes.iter().all(|(x, y)| x.size == y.size);
        BottomLeftPacking {
            width,
            height,
            boxes,
            candidates: Candidates::All,
            squares,
        }
    }

    pub fn with_candidates(mut self, candidates: Candidates) -> Self {
        self.candidates = candidates;
        self
    }

    fn is_placed(dom: &Domains, (x, y): &(IntervalVar, IntervalVar)) -> bool {
        dom.is_bound(x.start) && dom.is_bound(y.start)
    }

    /// A decision fixing the size of a placed box, if any has an unbound size.
    fn size_decision(&self, dom: &Domains) -> Option<Decision> {
        self.boxes
            .iter()
            .filter(|b| Self::is_placed(dom, b))
            .flat_map(|(x, y)| [x.size, y.size])
            .find(|&size| !dom.is_bound(size))
            .map(|size| Decision::binary(size.geq(dom.ub(size))))
    }

    fn occupancy(&self, dom: &Domains) -> Occupancy {
        let (w, h) = (self.width.max(0) as usize, self.height.max(0) as usize);
        let mut covered = vec![false; w * h];
        for (x, y) in &self.boxes {
            let (Some(x0), Some(dx), Some(y0), Some(dy)) =
                (dom.value(x.start), dom.value(x.size), dom.value(y.start), dom.value(y.size))
            else {
                continue;
            };
            for row in y0.max(0)..(y0 + dy).min(self.height) {
                for col in x0.max(0)..(x0 + dx).min(self.width) {
                    covered[row as usize * w + col as usize] = true;
                }
            }
        }
        let heights = (0..w)
            .map(|col| (0..h).take_while(|&row| covered[row * w + col]).count())
            .collect();
        Occupancy {
            width: w,
            height: h,
            covered,
            heights,
        }
    }

    /// Lower bound on the number of boxes needed to cover the free cells.
    ///
    /// The lowest free cell of a column is covered by a box resting on the column. Each run of
    /// columns of the same height thus needs a box of its own, unless a single box may span several
    /// runs at this height. A pit, lower than both its neighbours, can only be filled with squares
    /// no wider than the pit, stacked up to its lowest neighbour.
    fn min_boxes_to_fill(&self, occupancy: &Occupancy) -> usize {
        let heights = &occupancy.heights;
        let top = occupancy.height;
        let mut count = 0;
        // (height, first column) of the areas a single box may span
        let mut spans: Vec<(usize, usize)> = Vec::new();
        let mut first = 0;
        while first < heights.len() {
            let h = heights[first];
            let last = first + heights[first..].iter().take_while(|&&other| other == h).count() - 1;
            if h < top {
                let left = if first > 0 { heights[first - 1] } else { top };
                let right = heights.get(last + 1).copied().unwrap_or(top);
                if self.squares && left > h && right > h {
                    let run = last + 1 - first;
                    let depth = (first..=last)
                        .map(|col| occupancy.free_above(col, h).min(left.min(right) - h))
                        .max()
                        .unwrap_or(0);
                    count += div_ceil(run, top - h).max(div_ceil(depth, run));
                } else {
                    let start = (0..first)
                        .rev()
                        .take_while(|&col| heights[col] <= h)
                        .last()
                        .unwrap_or(first);
                    if !spans.contains(&(h, start)) {
                        spans.push((h, start));
                        count += 1;
                    }
                }
            }
            first = last + 1;
        }
        count
    }

    /// Largest width of the box with the given intervals when its corner is at `cell`, if it may start there.
    fn max_width(dom: &Domains, x: &IntervalVar, y: &IntervalVar, cell: FreeCell) -> Option<IntCst> {
        let starts_at = |start: IVar, at: IntCst| dom.lb(start) <= at && at <= dom.ub(start);
        if !starts_at(x.start, cell.x) || !starts_at(y.start, cell.y) || dom.lb(y.size) > cell.free_above {
            return None;
        }
        let mut max = cell.free_right.min(dom.ub(x.size));
        if x.size == y.size {
            max = max.min(cell.free_above);
        }
        Some(max)
    }

    /// Places the box of index `i` at `cell` with the given width.
    fn place(&self, dom: &Domains, i: usize, cell: FreeCell, width: IntCst) -> Branch {
        let (x, y) = &self.boxes[i];
        let mut branch: Branch = smallvec![
            x.start.leq(cell.x),
            x.start.geq(cell.x),
            y.start.leq(cell.y),
            y.start.geq(cell.y),
            x.size.leq(width),
            x.size.geq(width),
        ];
        if y.size != x.size {
            branch.push(y.size.leq(cell.free_above));
        }
        if self.candidates == Candidates::SortedBySize && i >= 2 && !Self::is_placed(dom, &self.boxes[i - 1]) {
            branch.push(self.boxes[i - 1].0.size.lt(width));
        }
        branch
    }

    /// Alternatives for the box covering `cell`: each candidate box with each width that fits, largest first.
    fn placement_decision(&self, dom: &Domains, cell: FreeCell) -> Decision {
        let unplaced = (0..self.boxes.len()).filter(|&i| !Self::is_placed(dom, &self.boxes[i]));
        let candidates: Vec<usize> = match self.candidates {
            Candidates::First => unplaced.take(1).collect(),
            Candidates::All | Candidates::SortedBySize => unplaced.collect(),
        };
        let mut options: Vec<(IntCst, usize)> = Vec::new();
        for &i in &candidates {
            let (x, y) = &self.boxes[i];
            if let Some(max) = Self::max_width(dom, x, y, cell) {
                options.extend((dom.lb(x.size)..=max).map(|width| (width, i)));
            }
        }
        // stable: among boxes of the same width, the declaration order is kept
        options.sort_by_key(|&(width, _)| -width);
        Decision::new(options.into_iter().map(|(width, i)| self.place(dom, i, cell, width)))
    }
}

impl<L> SearchControl<L> for BottomLeftPacking {
    fn next_decision(&mut self, _stats: &Stats, model: &Model<L>) -> Option<Decision> {
        let dom = &model.state;
        if let Some(decision) = self.size_decision(dom) {
            return Some(decision);
        }
        let unplaced = self.boxes.iter().filter(|b| !Self::is_placed(dom, b)).count();
        if unplaced == 0 {
            return None;
        }
        let occupancy = self.occupancy(dom);
        match occupancy.first_free_cell() {
            Some(cell) if self.min_boxes_to_fill(&occupancy) <= unplaced => Some(self.placement_decision(dom, cell)),
            // full container, or too few boxes left to fill it
            _ => Some(Decision::fail()),
        }
    }
}
