//! SLD proof search with backtracking
//!
//! A depth-first resolver over a game record. Goals live on an explicit
//! stack; every resolved goal leaves a choice point holding the remaining
//! alternatives, a frame checkpoint, and the goal-stack watermark.
//! Backtracking restores the topmost choice point and tries its next
//! alternative; an exhausted choice point puts its goal back on the stack so
//! an earlier alternative can re-resolve it. Answers stream lazily in clause
//! order, left-to-right within conjunctions. Dropping the stream cancels the
//! query; failure is an empty stream, not an error.

use super::bindings::{Bindings, Checkpoint};
use super::builtins::{recognize, sort_dedup, succ_solution, Builtin, BuiltinCall};
use crate::db::GameRecord;
use crate::error::{EngineError, Result};
use crate::gdl::clause::CompiledClause;
use crate::gdl::symbols::WellKnown;
use crate::gdl::term::{Term, Var};

/// Status of the answer stream after one resolution step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// A solution is available
    Yield,
    /// Progress was made; step again
    Continue,
    /// The solution space is exhausted
    Done,
}

/// One answer: the query's variable assignment.
///
/// Slot `i` holds the binding of query variable `i`, `None` if the variable
/// was left unconstrained by the proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    bindings: Vec<Option<Term>>,
}

impl Answer {
    pub fn get(&self, var: Var) -> Option<&Term> {
        self.bindings.get(var.ord()).and_then(Option::as_ref)
    }

    pub fn bindings(&self) -> &[Option<Term>] {
        &self.bindings
    }
}

/// Lazy stream of answers to a query against one game record
#[derive(Debug)]
pub struct Answers<'a> {
    record: &'a GameRecord,
    well: WellKnown,
    bindings: Bindings,
    goals: Vec<Term>,
    choices: Vec<ChoicePoint<'a>>,
    query_vars: u32,
    exhausted: bool,
}

#[derive(Debug)]
struct ChoicePoint<'a> {
    goal: Term,
    alternatives: Alternatives<'a>,
    goals_len: usize,
    checkpoint: Checkpoint,
}

#[derive(Debug)]
enum Alternatives<'a> {
    /// Clause lookup cursor
    Clauses {
        clauses: &'a [CompiledClause],
        next: usize,
    },
    /// `member/2`: remaining list to try
    Member { item: Term, rest: Term },
    /// `or/2`: branches not yet taken
    Disjunction { branches: [Term; 2], next: usize },
    /// Deterministic expansion into subgoals (conjunction, `true`)
    Expand { subgoals: Vec<Term>, fired: bool },
    /// Single-shot native call
    Eval { call: BuiltinCall, fired: bool },
    /// No alternatives (unresolvable goal shape)
    Fail,
}

impl<'a> Answers<'a> {
    /// Start a proof search for `goal`. Query variables are the variables
    /// occurring in the goal; their bindings are reported per answer.
    pub fn new(record: &'a GameRecord, well: WellKnown, goal: Term) -> Self {
        let query_vars = goal.max_var().map_or(0, |v| v + 1);
        Answers {
            record,
            well,
            bindings: Bindings::new(query_vars),
            goals: vec![goal],
            choices: Vec::new(),
            query_vars,
            exhausted: false,
        }
    }

    /// Perform a single resolution step.
    ///
    /// Finer-grained than the iterator: callers can cancel between steps,
    /// not just between answers.
    pub fn step(&mut self) -> Result<Step> {
        if let Some(goal) = self.goals.pop() {
            let checkpoint = self.bindings.checkpoint();
            let goals_len = self.goals.len();
            let (goal, alternatives) = self.classify(goal);
            self.choices.push(ChoicePoint {
                goal,
                alternatives,
                goals_len,
                checkpoint,
            });
        }
        if self.resume_or_backtrack()? {
            if self.goals.is_empty() {
                Ok(Step::Yield)
            } else {
                Ok(Step::Continue)
            }
        } else {
            Ok(Step::Done)
        }
    }

    /// The current assignment of the query variables.
    /// Valid right after `step` returned `Yield`.
    pub fn answer(&self) -> Answer {
        let bindings = (0..self.query_vars)
            .map(|i| {
                let resolved = self.bindings.resolve(&Term::var(i));
                match resolved {
                    Term::Var(_) => None,
                    term => Some(term),
                }
            })
            .collect();
        Answer { bindings }
    }

    /// Run the search to completion, reporting whether any answer exists
    pub(crate) fn any(&mut self) -> Result<bool> {
        loop {
            match self.step()? {
                Step::Yield => return Ok(true),
                Step::Continue => continue,
                Step::Done => return Ok(false),
            }
        }
    }

    /// Run the search to completion, instantiating `template` per answer
    pub(crate) fn collect_instances(&mut self, template: &Term) -> Result<Vec<Term>> {
        let mut instances = Vec::new();
        loop {
            match self.step()? {
                Step::Yield => instances.push(self.bindings.resolve(template)),
                Step::Continue => continue,
                Step::Done => return Ok(instances),
            }
        }
    }

    /// Determine the alternatives for a goal. The `state/4` wrapper is
    /// resolved here: `true/1` and `does/2` short-circuit to membership in
    /// the truth and move lists, everything else becomes a lookup in the
    /// `state_dynamic/4` table.
    fn classify(&self, goal: Term) -> (Term, Alternatives<'a>) {
        let walked = self.bindings.walk(&goal).clone();
        let well = self.well;

        if let Term::Compound(f, args) = &walked {
            if *f == well.state && args.len() == 4 {
                let inner = self.bindings.walk(&args[3]).clone();
                match &inner {
                    Term::Compound(g, inner_args)
                        if *g == well.true_ && inner_args.len() == 1 =>
                    {
                        return (
                            walked.clone(),
                            Alternatives::Member {
                                item: inner_args[0].clone(),
                                rest: args[1].clone(),
                            },
                        );
                    }
                    Term::Compound(g, inner_args)
                        if *g == well.does && inner_args.len() == 2 =>
                    {
                        return (
                            walked.clone(),
                            Alternatives::Member {
                                item: inner.clone(),
                                rest: args[2].clone(),
                            },
                        );
                    }
                    _ => {
                        // Re-shape into the table's head form so clause
                        // heads unify argument-for-argument.
                        let lookup = Term::Compound(
                            well.state_dynamic,
                            vec![
                                args[0].clone(),
                                args[1].clone(),
                                args[2].clone(),
                                inner.clone(),
                            ],
                        );
                        let alternatives = match inner.functor() {
                            Some(pred) => Alternatives::Clauses {
                                clauses: self.record.dynamics(pred),
                                next: 0,
                            },
                            None => Alternatives::Fail,
                        };
                        return (lookup, alternatives);
                    }
                }
            }
            if *f == well.state_dynamic && args.len() == 4 {
                let inner = self.bindings.walk(&args[3]).clone();
                let alternatives = match inner.functor() {
                    Some(pred) => Alternatives::Clauses {
                        clauses: self.record.dynamics(pred),
                        next: 0,
                    },
                    None => Alternatives::Fail,
                };
                return (walked, alternatives);
            }
        }

        match recognize(&walked, &well) {
            Some(Builtin::TrueGoal) => (
                walked,
                Alternatives::Expand {
                    subgoals: vec![],
                    fired: false,
                },
            ),
            Some(Builtin::Conjunction(a, b)) => (
                walked,
                Alternatives::Expand {
                    subgoals: vec![a, b],
                    fired: false,
                },
            ),
            Some(Builtin::Disjunction(a, b)) => (
                walked,
                Alternatives::Disjunction {
                    branches: [a, b],
                    next: 0,
                },
            ),
            Some(Builtin::Member { item, list }) => {
                (walked, Alternatives::Member { item, rest: list })
            }
            Some(Builtin::Call(call)) => (walked, Alternatives::Eval { call, fired: false }),
            None => match walked.functor() {
                Some(pred) => (
                    walked,
                    Alternatives::Clauses {
                        clauses: self.record.statics(pred),
                        next: 0,
                    },
                ),
                // Unbound or integer goals are unprovable.
                None => (walked, Alternatives::Fail),
            },
        }
    }

    /// Backtrack to the first choice point that still has an alternative
    fn resume_or_backtrack(&mut self) -> Result<bool> {
        while !self.choices.is_empty() {
            {
                let top = self.choices.last().expect("choice point present");
                self.bindings.restore(&top.checkpoint);
                self.goals.truncate(top.goals_len);
            }
            if self.resume_top()? {
                return Ok(true);
            }
            // Exhausted: discard and put the goal back so an earlier
            // alternative can re-resolve it in a different context.
            let discarded = self.choices.pop().expect("choice point present");
            self.goals.push(discarded.goal);
        }
        Ok(false)
    }

    fn resume_top(&mut self) -> Result<bool> {
        let mut top = self.choices.pop().expect("choice point present");
        let committed = self.resume(&mut top);
        self.choices.push(top);
        committed
    }

    /// Try the next alternative of a choice point; `Ok(true)` means we
    /// committed to one and extended the goal stack accordingly.
    fn resume(&mut self, cp: &mut ChoicePoint<'a>) -> Result<bool> {
        match &mut cp.alternatives {
            Alternatives::Clauses { clauses, next } => {
                while *next < clauses.len() {
                    let clause = &clauses[*next];
                    *next += 1;
                    self.bindings.restore(&cp.checkpoint);
                    self.goals.truncate(cp.goals_len);

                    let offset = self.bindings.alloc(clause.var_slots);
                    let head = clause.head.shift_vars(offset);
                    if self.bindings.unify(&cp.goal, &head) {
                        for literal in clause.body.iter().rev() {
                            self.goals.push(literal.shift_vars(offset));
                        }
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Alternatives::Member { item, rest } => loop {
                self.bindings.restore(&cp.checkpoint);
                self.goals.truncate(cp.goals_len);
                let list = self.bindings.walk(rest).clone();
                match list {
                    Term::Compound(f, args) if f == self.well.cons && args.len() == 2 => {
                        *rest = args[1].clone();
                        if self.bindings.unify(item, &args[0]) {
                            return Ok(true);
                        }
                    }
                    _ => return Ok(false),
                }
            },
            Alternatives::Disjunction { branches, next } => {
                if *next < branches.len() {
                    let branch = branches[*next].clone();
                    *next += 1;
                    self.goals.push(branch);
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            Alternatives::Expand { subgoals, fired } => {
                if *fired {
                    return Ok(false);
                }
                *fired = true;
                for subgoal in subgoals.iter().rev() {
                    self.goals.push(subgoal.clone());
                }
                Ok(true)
            }
            Alternatives::Eval { call, fired } => {
                if *fired {
                    return Ok(false);
                }
                *fired = true;
                self.eval(call)
            }
            Alternatives::Fail => Ok(false),
        }
    }

    /// Evaluate a single-shot built-in under the current frame
    fn eval(&mut self, call: &BuiltinCall) -> Result<bool> {
        match call {
            BuiltinCall::Distinct(x, y) => {
                let x = self.bindings.resolve(x);
                let y = self.bindings.resolve(y);
                if !x.is_ground() {
                    return Err(EngineError::UnboundInDistinct(x));
                }
                if !y.is_ground() {
                    return Err(EngineError::UnboundInDistinct(y));
                }
                Ok(x != y)
            }
            BuiltinCall::Not(goal) => {
                let goal = self.bindings.resolve(goal);
                if !goal.is_ground() {
                    return Err(EngineError::UnboundInNegation(goal));
                }
                log::trace!("negation sub-search on {:?}", goal);
                let mut sub = Answers::new(self.record, self.well, goal);
                Ok(!sub.any()?)
            }
            BuiltinCall::Findall { template, goal, out } => {
                let instances = self.solve_aggregate(template, goal)?;
                let list = Term::list(instances, &self.well);
                Ok(self.bindings.unify(out, &list))
            }
            BuiltinCall::Bagof { template, goal, out } => {
                let instances = self.solve_aggregate(template, goal)?;
                if instances.is_empty() {
                    return Ok(false);
                }
                let list = Term::list(instances, &self.well);
                Ok(self.bindings.unify(out, &list))
            }
            BuiltinCall::Setof { template, goal, out } => {
                let instances = sort_dedup(self.solve_aggregate(template, goal)?);
                if instances.is_empty() {
                    return Ok(false);
                }
                let list = Term::list(instances, &self.well);
                Ok(self.bindings.unify(out, &list))
            }
            BuiltinCall::Succ(x, y) => {
                let x = self.bindings.resolve(x);
                let y = self.bindings.resolve(y);
                match succ_solution(&x, &y) {
                    Some((target, value)) => Ok(self.bindings.unify(&target, &value)),
                    None => Ok(false),
                }
            }
        }
    }

    /// Collect every instantiation of `template` over the solutions of
    /// `goal`, in a sub-search sharing this frame's current bindings
    fn solve_aggregate(&mut self, template: &Term, goal: &Term) -> Result<Vec<Term>> {
        let template = self.bindings.resolve(template);
        let goal = self.bindings.resolve(goal);
        // Unbound variables shared between template and goal keep their
        // ordinals; size the sub-frame to cover them all.
        let slots = template
            .max_var()
            .into_iter()
            .chain(goal.max_var())
            .max()
            .map_or(0, |v| v + 1);
        let mut sub = Answers {
            record: self.record,
            well: self.well,
            bindings: Bindings::new(slots),
            goals: vec![goal],
            choices: Vec::new(),
            query_vars: slots,
            exhausted: false,
        };
        sub.collect_instances(&template)
    }
}

impl Iterator for Answers<'_> {
    type Item = Result<Answer>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        loop {
            match self.step() {
                Ok(Step::Yield) => return Some(Ok(self.answer())),
                Ok(Step::Continue) => continue,
                Ok(Step::Done) => {
                    self.exhausted = true;
                    return None;
                }
                Err(error) => {
                    self.exhausted = true;
                    return Some(Err(error));
                }
            }
        }
    }
}
