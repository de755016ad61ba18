// SPDX-License-Identifier: (MIT OR Apache-2.0)

//! BIR generation - lower a resolved package AST to basic-block CFGs.

mod call;
mod expr;
mod stmt;

pub use call::{function_lookup_key, resolve_callee_package, ImportAliasMap};

use crate::error::{BirGenError, BirGenErrorKind};
use crate::verify::verify_function;
use crate::{
    BirConstant, BirFunction, BirGlobalVariableDcl, BirImportModule, BirOperand, BirPackage,
    BirTypeDefinition, BirGenOptions, ConstValue, FunctionBuilder, TerminatorKind, VarKind,
    VarScope,
};
use bir_ast::decl::{Constant, Function, FunctionBody, ImportPackage, Package};
use bir_ast::expr::ExprKind;
use bir_ast::stmt::Block;
use bir_ast::{PackageId, SymbolRef};
use bir_context::CompilerContext;
use std::collections::HashMap;
use std::sync::Arc;

/// Lower `package` with default options.
pub fn gen_bir(ctx: &mut CompilerContext, package: &Package) -> Result<BirPackage, BirGenError> {
    gen_bir_with_options(ctx, package, &BirGenOptions::default())
}

/// Lower `package`. The first error aborts the whole package.
pub fn gen_bir_with_options(
    ctx: &mut CompilerContext,
    package: &Package,
    options: &BirGenOptions,
) -> Result<BirPackage, BirGenError> {
    let package_id = ctx.intern_package_id(package.package_id.clone());
    tracing::debug!(
        package = %package_id,
        imports = package.imports.len(),
        constants = package.constants.len(),
        functions = package.functions.len(),
        "generating BIR"
    );

    let mut bir = BirPackage::new(Arc::clone(&package_id));
    let import_aliases = process_imports(ctx, &package.imports, &mut bir);

    for type_def in &package.type_definitions {
        match &type_def.ty {
            Some(ty) => bir.type_definitions.push(BirTypeDefinition {
                name: type_def.name.value.clone(),
                original_name: type_def.name.value.clone(),
                ty: ty.clone(),
                span: type_def.span,
            }),
            None => tracing::warn!(
                name = %type_def.name.value,
                "skipping type definition with no determined type"
            ),
        }
    }

    for global in &package.global_vars {
        bir.global_vars.push(BirGlobalVariableDcl {
            name: global.name.value.clone(),
            original_name: global.name.value.clone(),
            kind: VarKind::Global,
            scope: VarScope::Global,
            ty: global.ty.clone(),
            span: global.span,
        });
    }

    let mut constants = HashMap::new();
    for constant in &package.constants {
        let lowered = lower_constant(constant)?;
        constants.insert(ctx.ref_symbol(constant.symbol), lowered.clone());
        bir.constants.push(lowered);
    }

    let unit = UnitContext {
        ctx: &*ctx,
        options,
        package_id,
        constants,
        import_aliases,
    };

    for function in &package.functions {
        let lowered = BirLowerer::lower_function(&unit, function)?;
        if options.verify {
            verify_function(&lowered)?;
        }
        if lowered.name == options.entry_function {
            bir.main_function = Some(bir.functions.len());
        }
        bir.functions.push(lowered);
    }

    Ok(bir)
}

/// Build the alias map and the import module list.
///
/// An import without an explicit alias is reachable through its last name
/// component. When two imports claim one alias, the later one wins.
fn process_imports(
    ctx: &mut CompilerContext,
    imports: &[ImportPackage],
    bir: &mut BirPackage,
) -> ImportAliasMap {
    let mut aliases = ImportAliasMap::new();
    for import in imports {
        let org = import
            .org_name
            .as_ref()
            .map(|i| i.as_str())
            .filter(|s| !s.is_empty());
        let comps: Vec<&str> = import.pkg_name_comps.iter().map(|c| c.as_str()).collect();
        let version = import
            .version
            .as_ref()
            .map(|i| i.as_str())
            .filter(|s| !s.is_empty());
        let package_id = ctx.new_package_id(org, &comps, version);

        let alias = import
            .alias
            .as_ref()
            .map(|a| a.as_str())
            .filter(|s| !s.is_empty())
            .or_else(|| comps.last().copied());
        if let Some(alias) = alias {
            if let Some(previous) = aliases.insert(alias.to_string(), Arc::clone(&package_id)) {
                tracing::warn!(
                    alias = %alias,
                    previous = %previous,
                    package = %package_id,
                    "import alias rebound, the later import wins"
                );
            }
        }
        tracing::debug!(package = %package_id, alias = ?alias, "import");
        bir.import_modules.push(BirImportModule { package_id });
    }
    aliases
}

fn lower_constant(constant: &Constant) -> Result<BirConstant, BirGenError> {
    match &constant.value.kind {
        ExprKind::Literal(lit) => Ok(BirConstant {
            name: constant.name.value.clone(),
            symbol: constant.symbol,
            ty: constant.ty.clone(),
            value: ConstValue::from(lit),
            span: constant.span,
        }),
        _ => Err(BirGenError::new(
            BirGenErrorKind::UnsupportedConstant {
                name: constant.name.value.clone(),
            },
            constant.value.span,
        )),
    }
}

/// Read-only state shared by every function of one package.
pub(crate) struct UnitContext<'a> {
    ctx: &'a CompilerContext,
    options: &'a BirGenOptions,
    package_id: Arc<PackageId>,
    /// Keyed by the identity service's reference key.
    constants: HashMap<SymbolRef, BirConstant>,
    import_aliases: ImportAliasMap,
}

/// Per-function lowering state.
pub(crate) struct BirLowerer<'a> {
    unit: &'a UnitContext<'a>,
    builder: FunctionBuilder,
    return_slot: BirOperand,
}

impl<'a> BirLowerer<'a> {
    fn lower_function(
        unit: &'a UnitContext<'a>,
        function: &Function,
    ) -> Result<BirFunction, BirGenError> {
        let name = function.name.value.clone();
        let lookup_key = function_lookup_key(&unit.package_id, &name);

        let mut builder = FunctionBuilder::new(unit.options.block_id_prefix.clone());
        let return_slot =
            builder
                .locals()
                .allocate("%0".to_string(), function.return_type.clone(), VarKind::Return);

        let mut lowerer = BirLowerer {
            unit,
            builder,
            return_slot,
        };

        let mut required_params = Vec::with_capacity(function.params.len());
        for param in &function.params {
            let key = unit.ctx.ref_symbol(param.symbol);
            let operand = lowerer.builder.locals().allocate_bound(
                param.name.value.clone(),
                param.ty.clone(),
                VarKind::Argument,
                key,
            );
            required_params.push(operand);
        }

        match &function.body {
            FunctionBody::Block(block) => lowerer.lower_block_body(block)?,
            FunctionBody::Expr(expr) => {
                let entry = lowerer.builder.add_block();
                let value = lowerer.lower_expr(entry, expr)?;
                lowerer.move_to_return_slot(value.block, value.result, expr.span)?;
                lowerer
                    .builder
                    .terminate(value.block, None, TerminatorKind::Return, expr.span)?;
            }
            FunctionBody::External => {
                return Err(BirGenError::new(
                    BirGenErrorKind::UnsupportedFunctionBody {
                        function: name,
                        reason: "external functions have no body to lower",
                    },
                    function.span,
                ))
            }
        }

        let parts = lowerer.builder.finish()?;
        tracing::debug!(
            function = %name,
            %lookup_key,
            blocks = parts.basic_blocks.len(),
            locals = parts.local_vars.len(),
            "lowered function"
        );

        Ok(BirFunction {
            original_name: name.clone(),
            name,
            lookup_key,
            span: function.span,
            return_type: function.return_type.clone(),
            required_params,
            return_variable: return_slot,
            local_vars: parts.local_vars,
            basic_blocks: parts.basic_blocks,
            scopes: parts.scopes,
        })
    }

    /// The body shares the function scope. Falling off the end returns.
    fn lower_block_body(&mut self, body: &Block) -> Result<(), BirGenError> {
        let entry = self.builder.add_block();
        if let Some(last) = self.lower_stmts(entry, &body.stmts)? {
            self.builder
                .terminate(last, None, TerminatorKind::Return, body.span)?;
        }
        Ok(())
    }
}
