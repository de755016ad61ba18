// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! Display implementations for BIR types.
//!
//! Operands print as the name of the local they refer to, so instruction
//! text is only available through the owning function.

use crate::*;
use std::fmt;

fn ty_or_unknown(ty: Option<&bir_ast::SemType>) -> String {
    ty.map(|t| t.to_string())
        .unwrap_or_else(|| "<UNKNOWN>".to_string())
}

impl BirFunction {
    fn operand_name(&self, op: BirOperand) -> &str {
        self.local(op).map(|d| d.name.as_str()).unwrap_or("?")
    }

    fn block_name(&self, id: BlockId) -> String {
        self.block(id)
            .map(|b| b.name.clone())
            .unwrap_or_else(|| format!("?{}", id.0))
    }

    fn operand_list(&self, ops: &[BirOperand], sep: &str) -> String {
        ops.iter()
            .map(|op| self.operand_name(*op))
            .collect::<Vec<_>>()
            .join(sep)
    }

    fn fmt_instruction(&self, f: &mut fmt::Formatter<'_>, inst: &NonTerminator) -> fmt::Result {
        let lhs = self.operand_name(inst.lhs);
        match &inst.kind {
            NonTerminatorKind::Move { rhs } => write!(f, "{} = {};", lhs, self.operand_name(*rhs)),
            NonTerminatorKind::ConstantLoad { value, .. } => {
                write!(f, "{} = ConstantLoad {};", lhs, value)
            }
            NonTerminatorKind::BinaryOp { op, rhs1, rhs2 } => write!(
                f,
                "{} = {} {} {};",
                lhs,
                op,
                self.operand_name(*rhs1),
                self.operand_name(*rhs2)
            ),
            NonTerminatorKind::UnaryOp { op, rhs } => {
                write!(f, "{} = {} {};", lhs, op, self.operand_name(*rhs))
            }
            NonTerminatorKind::NewArray {
                element_type,
                size,
                values,
            } => write!(
                f,
                "{} = newArray {}[{}]{{{}}};",
                lhs,
                ty_or_unknown(element_type.as_ref()),
                self.operand_name(*size),
                self.operand_list(values, ", ")
            ),
            NonTerminatorKind::NewStructure { ty, entries } => {
                let entries: Vec<String> = entries
                    .iter()
                    .map(|e| match e {
                        MappingEntry::KeyValue { key, value } => {
                            format!("{}={}", self.operand_name(*key), self.operand_name(*value))
                        }
                        MappingEntry::Spread(value) => format!("...{}", self.operand_name(*value)),
                    })
                    .collect();
                write!(
                    f,
                    "{} = newMap {}{{{}}};",
                    lhs,
                    ty_or_unknown(ty.as_ref()),
                    entries.join(", ")
                )
            }
            NonTerminatorKind::NewError {
                ty,
                message,
                cause,
                detail,
            } => write!(
                f,
                "{} = newError {}({}, {}, {});",
                lhs,
                ty_or_unknown(ty.as_ref()),
                self.operand_name(*message),
                self.operand_name(*cause),
                self.operand_name(*detail)
            ),
            NonTerminatorKind::NewInstance { class_name } => {
                write!(f, "{} = newObject {};", lhs, class_name)
            }
            NonTerminatorKind::NewTypedesc { ty } => write!(f, "{} = newTypedesc {};", lhs, ty),
            NonTerminatorKind::FieldAccess { access, key, rhs } => {
                let key = self.operand_name(*key);
                let rhs = self.operand_name(*rhs);
                if access.is_store() {
                    write!(f, "{}[{}] = {};", lhs, key, rhs)
                } else {
                    write!(f, "{} = {}[{}];", lhs, rhs, key)
                }
            }
            NonTerminatorKind::TypeCast { rhs, ty } => write!(
                f,
                "{} = <{}>({});",
                lhs,
                ty_or_unknown(ty.as_ref()),
                self.operand_name(*rhs)
            ),
            NonTerminatorKind::TypeTest { rhs, ty, negated } => write!(
                f,
                "{} = {} {} {};",
                lhs,
                self.operand_name(*rhs),
                if *negated { "!is" } else { "is" },
                ty_or_unknown(ty.as_ref())
            ),
            NonTerminatorKind::IsLike { rhs, ty } => write!(
                f,
                "{} = {} isLike {};",
                lhs,
                self.operand_name(*rhs),
                ty_or_unknown(ty.as_ref())
            ),
            NonTerminatorKind::FpLoad {
                lookup_key,
                closure_maps,
            } => write!(
                f,
                "{} = fpLoad {}({});",
                lhs,
                lookup_key,
                self.operand_list(closure_maps, ",")
            ),
            NonTerminatorKind::Platform { name, operands } => write!(
                f,
                "{} = platform {}({});",
                lhs,
                name,
                self.operand_list(operands, ",")
            ),
        }
    }

    fn fmt_terminator(&self, f: &mut fmt::Formatter<'_>, term: &Terminator) -> fmt::Result {
        if let Some(lhs) = term.lhs {
            write!(f, "{} = ", self.operand_name(lhs))?;
        }
        match &term.kind {
            TerminatorKind::Goto { target } => write!(f, "GOTO {};", self.block_name(*target)),
            TerminatorKind::Return => write!(f, "return;"),
            TerminatorKind::Branch {
                op,
                true_bb,
                false_bb,
            } => write!(
                f,
                "{} ? {} : {};",
                self.operand_name(*op),
                self.block_name(*true_bb),
                self.block_name(*false_bb)
            ),
            TerminatorKind::Call {
                args,
                callee,
                then_bb,
                ..
            } => write!(
                f,
                "{}({}) -> {};",
                callee.name,
                self.operand_list(args, ","),
                self.block_name(*then_bb)
            ),
            TerminatorKind::AsyncCall {
                args,
                callee,
                then_bb,
            } => write!(
                f,
                "start {}({}) -> {};",
                callee.name,
                self.operand_list(args, ","),
                self.block_name(*then_bb)
            ),
            TerminatorKind::Panic { error } => write!(f, "panic {};", self.operand_name(*error)),
            TerminatorKind::Wait { futures, then_bb } => write!(
                f,
                "wait {} -> {};",
                self.operand_list(futures, "|"),
                self.block_name(*then_bb)
            ),
            TerminatorKind::WaitAll {
                keys,
                futures,
                then_bb,
            } => {
                let pairs: Vec<String> = keys
                    .iter()
                    .zip(futures)
                    .map(|(k, fut)| format!("{}: {}", k, self.operand_name(*fut)))
                    .collect();
                write!(
                    f,
                    "wait {{{}}} -> {};",
                    pairs.join(", "),
                    self.block_name(*then_bb)
                )
            }
            TerminatorKind::FpCall {
                fp,
                args,
                is_async,
                then_bb,
            } => write!(
                f,
                "{}fp {}({}) -> {};",
                if *is_async { "start " } else { "" },
                self.operand_name(*fp),
                self.operand_list(args, ","),
                self.block_name(*then_bb)
            ),
            TerminatorKind::WorkerReceive {
                channel, then_bb, ..
            } => write!(f, "<- {} -> {};", channel, self.block_name(*then_bb)),
            TerminatorKind::WorkerSend {
                channel,
                data,
                is_sync,
                then_bb,
                ..
            } => write!(
                f,
                "{} {} {} -> {};",
                self.operand_name(*data),
                if *is_sync { "->>" } else { "->" },
                channel,
                self.block_name(*then_bb)
            ),
            TerminatorKind::Flush { channels, then_bb } => write!(
                f,
                "flush {} -> {};",
                channels.join(","),
                self.block_name(*then_bb)
            ),
            TerminatorKind::Lock { locked_bb } => {
                write!(f, "lock -> {};", self.block_name(*locked_bb))
            }
            TerminatorKind::FieldLock {
                local,
                field,
                locked_bb,
            } => write!(
                f,
                "lock {}.{} -> {};",
                self.operand_name(*local),
                field,
                self.block_name(*locked_bb)
            ),
            TerminatorKind::Unlock { unlock_bb } => {
                write!(f, "unlock -> {};", self.block_name(*unlock_bb))
            }
            TerminatorKind::WorkerAlternateReceive {
                channels, then_bb, ..
            } => write!(
                f,
                "<- {} -> {};",
                channels.join(" | "),
                self.block_name(*then_bb)
            ),
            TerminatorKind::WorkerMultipleReceive {
                receives, then_bb, ..
            } => {
                let pairs: Vec<String> = receives
                    .iter()
                    .map(|(field, channel)| format!("{}: {}", field, channel))
                    .collect();
                write!(
                    f,
                    "<- {{{}}} -> {};",
                    pairs.join(", "),
                    self.block_name(*then_bb)
                )
            }
        }
    }
}

impl fmt::Display for BirFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self
            .required_params
            .iter()
            .map(|p| ty_or_unknown(self.local(*p).and_then(|d| d.ty.as_ref())))
            .collect();
        write!(f, "{}({})", self.name, params.join(","))?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {}", ret)?;
        }
        writeln!(f, " {{")?;
        for block in &self.basic_blocks {
            writeln!(f, "  {} {{", block.name)?;
            for inst in &block.instructions {
                write!(f, "    ")?;
                self.fmt_instruction(f, inst)?;
                writeln!(f)?;
            }
            match &block.terminator {
                Some(term) => {
                    write!(f, "    ")?;
                    self.fmt_terminator(f, term)?;
                    writeln!(f)?;
                }
                None => writeln!(f, "    <unterminated>")?,
            }
            writeln!(f, "  }}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for BirPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {};", self.package_id)?;
        for import in &self.import_modules {
            writeln!(f, "import {};", import.package_id)?;
        }
        for global in &self.global_vars {
            writeln!(f, "{}  {};", global.name, ty_or_unknown(global.ty.as_ref()))?;
        }
        for constant in &self.constants {
            writeln!(f, "const {} = {};", constant.name, constant.value)?;
        }
        for function in &self.functions {
            writeln!(f, "{}", function)?;
        }
        Ok(())
    }
}
