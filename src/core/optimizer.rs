// src/core/optimizer.rs
//! Optional AST-to-AST simplification pass: constant folding and
//! dead-branch elimination.
//!
//! The pass is total (never fails), pure, and idempotent: rewrites are
//! local and bottom-up, so a second run finds nothing left to do. Folding
//! mirrors the evaluator's numeric semantics exactly and deliberately
//! refuses to fold anything that would fault at runtime (division or
//! modulo by zero, integer overflow) so the error surfaces at execution
//! time with its original source position.

use crate::core::ast::{AstNode, CatchClause, FieldDecl, MethodDecl};
use crate::core::token::TokenKind;

pub struct Optimizer {
    pub constant_folding: bool,
    pub dead_branch_elimination: bool,
}

impl Default for Optimizer {
    fn default() -> Self {
        Self { constant_folding: true, dead_branch_elimination: true }
    }
}

impl Optimizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity configuration: both rewrites disabled.
    pub fn disabled() -> Self {
        Self { constant_folding: false, dead_branch_elimination: false }
    }

    pub fn optimize(&self, node: AstNode) -> AstNode {
        // Children first (post-order), so nested foldables collapse
        // bottom-up before the parent is inspected.
        let mut node = self.optimize_children(node);

        if self.constant_folding {
            node = match node {
                AstNode::BinaryOp { op, left, right, line, column } => {
                    self.fold_binary(op, *left, *right, line, column)
                }
                other => other,
            };
        }

        if self.dead_branch_elimination {
            node = match node {
                AstNode::If { condition, then_branch, else_branch } => match *condition {
                    AstNode::BooleanLiteral(true) => *then_branch,
                    AstNode::BooleanLiteral(false) => {
                        else_branch.map(|b| *b).unwrap_or_else(AstNode::empty_block)
                    }
                    cond => AstNode::If {
                        condition: Box::new(cond),
                        then_branch,
                        else_branch,
                    },
                },
                AstNode::While { condition, body } => match *condition {
                    // The body never runs, so no side effects are lost.
                    AstNode::BooleanLiteral(false) => AstNode::empty_block(),
                    cond => AstNode::While { condition: Box::new(cond), body },
                },
                other => other,
            };
        }

        node
    }

    fn optimize_children(&self, node: AstNode) -> AstNode {
        match node {
            AstNode::Program(stmts) => AstNode::Program(self.optimize_all(stmts)),
            AstNode::Block(stmts) => AstNode::Block(self.optimize_all(stmts)),
            AstNode::VarDecl { name, ty, init, line, column } => AstNode::VarDecl {
                name,
                ty,
                init: init.map(|e| Box::new(self.optimize(*e))),
                line,
                column,
            },
            AstNode::ConstDecl { name, ty, init, line, column } => AstNode::ConstDecl {
                name,
                ty,
                init: Box::new(self.optimize(*init)),
                line,
                column,
            },
            // Function and method bodies are rewritten where they stand;
            // field defaults stay untouched until instantiation.
            AstNode::FunctionDecl(func) => {
                let mut decl = (*func).clone();
                decl.body = self.optimize_all(decl.body);
                AstNode::FunctionDecl(std::rc::Rc::new(decl))
            }
            AstNode::ClassDecl { name, superclass, fields, methods, line, column } => {
                let fields = fields
                    .into_iter()
                    .map(|f| {
                        let FieldDecl {
                            name,
                            ty,
                            default,
                            is_static,
                            is_public,
                            is_const,
                            line,
                            column,
                        } = f;
                        FieldDecl {
                            name,
                            ty,
                            default: default.map(|d| self.optimize(d)),
                            is_static,
                            is_public,
                            is_const,
                            line,
                            column,
                        }
                    })
                    .collect();
                let methods = methods
                    .into_iter()
                    .map(|m| {
                        let mut decl = (*m.func).clone();
                        decl.body = self.optimize_all(decl.body);
                        MethodDecl { func: std::rc::Rc::new(decl), ..m }
                    })
                    .collect();
                AstNode::ClassDecl { name, superclass, fields, methods, line, column }
            }
            AstNode::If { condition, then_branch, else_branch } => AstNode::If {
                condition: Box::new(self.optimize(*condition)),
                then_branch: Box::new(self.optimize(*then_branch)),
                else_branch: else_branch.map(|e| Box::new(self.optimize(*e))),
            },
            AstNode::While { condition, body } => AstNode::While {
                condition: Box::new(self.optimize(*condition)),
                body: Box::new(self.optimize(*body)),
            },
            AstNode::For { init, condition, step, body } => AstNode::For {
                init: init.map(|e| Box::new(self.optimize(*e))),
                condition: condition.map(|e| Box::new(self.optimize(*e))),
                step: step.map(|e| Box::new(self.optimize(*e))),
                body: Box::new(self.optimize(*body)),
            },
            AstNode::DoWhile { body, condition } => AstNode::DoWhile {
                body: Box::new(self.optimize(*body)),
                condition: Box::new(self.optimize(*condition)),
            },
            AstNode::Return { value, line, column } => AstNode::Return {
                value: value.map(|e| Box::new(self.optimize(*e))),
                line,
                column,
            },
            AstNode::TryCatch { try_block, catch, finally_block } => AstNode::TryCatch {
                try_block: Box::new(self.optimize(*try_block)),
                catch: catch.map(|c| {
                    let CatchClause { name, ty, body } = c;
                    CatchClause { name, ty, body: Box::new(self.optimize(*body)) }
                }),
                finally_block: finally_block.map(|b| Box::new(self.optimize(*b))),
            },
            AstNode::Show { args, line, column } => AstNode::Show {
                args: self.optimize_all(args),
                line,
                column,
            },
            AstNode::Assignment { op, target, value, line, column } => AstNode::Assignment {
                op,
                target, // assignment targets are places, not foldable values
                value: Box::new(self.optimize(*value)),
                line,
                column,
            },
            AstNode::BinaryOp { op, left, right, line, column } => AstNode::BinaryOp {
                op,
                left: Box::new(self.optimize(*left)),
                right: Box::new(self.optimize(*right)),
                line,
                column,
            },
            AstNode::UnaryOp { op, expr, line, column } => AstNode::UnaryOp {
                op,
                expr: Box::new(self.optimize(*expr)),
                line,
                column,
            },
            AstNode::Call { callee, args, line, column } => AstNode::Call {
                callee: Box::new(self.optimize(*callee)),
                args: self.optimize_all(args),
                line,
                column,
            },
            AstNode::New { class_name, args, line, column } => AstNode::New {
                class_name,
                args: self.optimize_all(args),
                line,
                column,
            },
            AstNode::MemberAccess { object, member, line, column } => AstNode::MemberAccess {
                object: Box::new(self.optimize(*object)),
                member,
                line,
                column,
            },
            AstNode::IndexAccess { object, index, line, column } => AstNode::IndexAccess {
                object: Box::new(self.optimize(*object)),
                index: Box::new(self.optimize(*index)),
                line,
                column,
            },
            AstNode::ReadInput { prompt, line, column } => AstNode::ReadInput {
                prompt: prompt.map(|e| Box::new(self.optimize(*e))),
                line,
                column,
            },
            AstNode::ListLiteral(elements) => AstNode::ListLiteral(self.optimize_all(elements)),
            AstNode::ObjectLiteral(props) => AstNode::ObjectLiteral(
                props.into_iter().map(|(k, v)| (k, self.optimize(v))).collect(),
            ),
            // Leaves: literals, identifiers, imports, este, romper/continua.
            other => other,
        }
    }

    fn optimize_all(&self, nodes: Vec<AstNode>) -> Vec<AstNode> {
        nodes.into_iter().map(|n| self.optimize(n)).collect()
    }

    /// Folds a binary node when both operands are numeric/boolean literals
    /// and the operation cannot fault; otherwise rebuilds the node as-is.
    fn fold_binary(
        &self,
        op: TokenKind,
        left: AstNode,
        right: AstNode,
        line: usize,
        column: usize,
    ) -> AstNode {
        if let Some(folded) = try_fold(&op, &left, &right) {
            return folded;
        }
        AstNode::BinaryOp { op, left: Box::new(left), right: Box::new(right), line, column }
    }
}

#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(i) => i == 0,
            Num::Float(f) => f == 0.0,
        }
    }
}

fn numeric(node: &AstNode) -> Option<Num> {
    match node {
        AstNode::IntLiteral(i) => Some(Num::Int(*i)),
        AstNode::FloatLiteral(f) => Some(Num::Float(*f)),
        _ => None,
    }
}

// These rules intentionally duplicate the evaluator's arithmetic: integer
// pairs stay integral except division, which always yields a decimal, and
// anything that would fault at runtime is left unfolded.
fn try_fold(op: &TokenKind, left: &AstNode, right: &AstNode) -> Option<AstNode> {
    if let (Some(l), Some(r)) = (numeric(left), numeric(right)) {
        return fold_numeric(op, l, r);
    }
    if let (AstNode::BooleanLiteral(l), AstNode::BooleanLiteral(r)) = (left, right) {
        let value = match op {
            TokenKind::AndAnd => *l && *r,
            TokenKind::OrOr => *l || *r,
            TokenKind::DoubleEquals => l == r,
            TokenKind::NotEquals => l != r,
            _ => return None,
        };
        return Some(AstNode::BooleanLiteral(value));
    }
    None
}

fn fold_numeric(op: &TokenKind, l: Num, r: Num) -> Option<AstNode> {
    use TokenKind::*;
    match op {
        Plus | Minus | Star => Some(match (l, r) {
            (Num::Int(a), Num::Int(b)) => {
                let folded = match op {
                    Plus => a.checked_add(b),
                    Minus => a.checked_sub(b),
                    _ => a.checked_mul(b),
                };
                AstNode::IntLiteral(folded?)
            }
            _ => {
                let (a, b) = (l.as_f64(), r.as_f64());
                AstNode::FloatLiteral(match op {
                    Plus => a + b,
                    Minus => a - b,
                    _ => a * b,
                })
            }
        }),
        Slash => {
            if r.is_zero() {
                return None; // must fault at runtime, never at fold time
            }
            Some(AstNode::FloatLiteral(l.as_f64() / r.as_f64()))
        }
        Percent => {
            if r.is_zero() {
                return None;
            }
            Some(match (l, r) {
                (Num::Int(a), Num::Int(b)) => {
                    AstNode::IntLiteral(((a % b) + b) % b) // sign of divisor
                }
                _ => {
                    let (a, b) = (l.as_f64(), r.as_f64());
                    AstNode::FloatLiteral(((a % b) + b) % b)
                }
            })
        }
        DoubleEquals => Some(AstNode::BooleanLiteral(l.as_f64() == r.as_f64())),
        NotEquals => Some(AstNode::BooleanLiteral(l.as_f64() != r.as_f64())),
        Less => Some(AstNode::BooleanLiteral(l.as_f64() < r.as_f64())),
        LessEqual => Some(AstNode::BooleanLiteral(l.as_f64() <= r.as_f64())),
        Greater => Some(AstNode::BooleanLiteral(l.as_f64() > r.as_f64())),
        GreaterEqual => Some(AstNode::BooleanLiteral(l.as_f64() >= r.as_f64())),
        _ => None,
    }
}
