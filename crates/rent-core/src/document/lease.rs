//! Lease text assembly

use crate::domain::{ContractType, ContractVersion, HydratedContract, PartyView};
use crate::error::DomainError;

use super::format::{long_date, money, percentage};
use super::layout::{Block, Run};

/// Surcharge applied to late rent payments, as a percentage of the rent
pub const LATE_FEE_PERCENTAGE: f64 = 10.0;

const ORDINALS: [&str; 14] = [
    "PRIMERA",
    "SEGUNDA",
    "TERCERA",
    "CUARTA",
    "QUINTA",
    "SEXTA",
    "SÉPTIMA",
    "OCTAVA",
    "NOVENA",
    "DÉCIMA",
    "DÉCIMA PRIMERA",
    "DÉCIMA SEGUNDA",
    "DÉCIMA TERCERA",
    "DÉCIMA CUARTA",
];

fn duration_label(contract_type: ContractType) -> &'static str {
    match contract_type {
        ContractType::Yearly => "anual",
    }
}

fn missing(what: &str) -> DomainError {
    DomainError::DependencyError(format!("{} is not loaded on the contract", what))
}

/// Build the lease document for one version. Every piece of related data is
/// checked before any block is produced.
pub fn compose(contract: &HydratedContract, version: &ContractVersion) -> Result<Vec<Block>, DomainError> {
    let landlord = contract.landlord.as_ref().ok_or_else(|| missing("landlord"))?;
    let tenant = contract.tenant.as_ref().ok_or_else(|| missing("tenant"))?;
    let tenant_address = tenant.address.as_ref().ok_or_else(|| missing("tenant address"))?;
    let property = contract.address.as_ref().ok_or_else(|| missing("property address"))?;

    let landlord_name = landlord.user.full_name();
    let tenant_name = tenant.user.full_name();

    let mut blocks = vec![
        Block::Title("CONTRATO DE ARRENDAMIENTO".to_string()),
        Block::Centered(format!("Versión {}", version.version_number)),
        Block::Space(8.0),
        Block::Paragraph(vec![
            Run::plain("CONTRATO DE ARRENDAMIENTO QUE CELEBRAN POR UNA PARTE"),
            Run::bold(format!(" {}", landlord_name)),
            Run::plain(
                ", A QUIEN EN LO SUCESIVO SE LE DENOMINARÁ \"EL ARRENDADOR\", Y POR LA OTRA",
            ),
            Run::bold(format!(" {}", tenant_name)),
            Run::plain(
                ", A QUIEN EN LO SUCESIVO SE LE DENOMINARÁ \"EL ARRENDATARIO\", AL TENOR DE LAS \
                 SIGUIENTES DECLARACIONES Y CLÁUSULAS:",
            ),
        ]),
        Block::Heading("DECLARACIONES".to_string()),
        Block::Paragraph(vec![
            Run::bold("I."),
            Run::plain(format!(
                " Declara EL ARRENDADOR ser legítimo propietario del inmueble ubicado en {}, \
                 y estar facultado para darlo en arrendamiento.",
                property.full_address()
            )),
        ]),
        Block::Paragraph(vec![
            Run::bold("II."),
            Run::plain(format!(
                " Declara EL ARRENDATARIO {} ser mayor de edad, contar con capacidad legal \
                 para obligarse en los términos del presente contrato y tener su domicilio en {}.",
                tenant_name,
                tenant_address.full_address()
            )),
        ]),
        Block::Paragraph(vec![
            Run::bold("III."),
            Run::plain(" Declara EL ARRENDATARIO que las siguientes personas fungen como sus referencias personales:"),
        ]),
        references_table(&contract.references),
        Block::Heading("CLÁUSULAS".to_string()),
    ];

    let mut clauses: Vec<(&str, Vec<Run>)> = vec![
        (
            "OBJETO",
            vec![Run::plain(format!(
                "EL ARRENDADOR da en arrendamiento a EL ARRENDATARIO el inmueble descrito en la \
                 declaración I, que se destinará exclusivamente a: {}.",
                version.business
            ))],
        ),
        (
            "RENTA",
            vec![
                Run::plain("EL ARRENDATARIO pagará una renta mensual de "),
                Run::keep(money(version.rent)),
                Run::plain(" a partir del "),
                Run::keep(long_date(version.start_date)),
                Run::plain(", en el domicilio de EL ARRENDADOR o en la forma que este le indique por escrito."),
            ],
        ),
        (
            "INCREMENTO",
            vec![
                Run::plain("La renta se incrementará en un "),
                Run::keep(percentage(version.rent_increase_percentage)),
                Run::plain(" al término de cada periodo de vigencia que el contrato sea renovado."),
            ],
        ),
        (
            "VIGENCIA",
            vec![
                Run::plain(format!(
                    "El presente contrato tiene una vigencia {}, que comprende del ",
                    duration_label(version.contract_type)
                )),
                Run::keep(long_date(version.start_date)),
                Run::plain(" al "),
                Run::keep(long_date(version.end_date)),
                Run::plain("."),
            ],
        ),
        (
            "DEPÓSITO",
            vec![
                Run::plain("EL ARRENDATARIO entrega en este acto la cantidad de "),
                Run::keep(money(version.deposit)),
                Run::plain(
                    " en calidad de depósito en garantía, que le será devuelta al término del \
                     contrato previa verificación del estado del inmueble y de que no existan adeudos.",
                ),
            ],
        ),
    ];

    if let Some(renewal) = version.renewal_date {
        clauses.push((
            "RENOVACIÓN",
            vec![
                Run::plain("Las partes podrán renovar el presente contrato a partir del "),
                Run::keep(long_date(renewal)),
                Run::plain(", previo acuerdo por escrito."),
            ],
        ));
    }
    if let Some(terms) = &version.special_terms {
        clauses.push(("CONDICIONES ESPECIALES", vec![Run::plain(terms.clone())]));
    }

    clauses.extend([
        (
            "RESCISIÓN",
            vec![Run::plain(
                "Serán causas de rescisión del presente contrato la falta de pago de dos o más \
                 mensualidades, el subarrendamiento o traspaso del inmueble sin consentimiento \
                 por escrito de EL ARRENDADOR, el uso del inmueble para fines distintos a los \
                 pactados y la realización de obras o modificaciones sin autorización.",
            )],
        ),
        (
            "CONSERVACIÓN",
            vec![Run::plain(
                "EL ARRENDATARIO se obliga a conservar el inmueble en el estado en que lo recibe \
                 y a responder de los daños que se causen por su negligencia o la de sus dependientes.",
            )],
        ),
        (
            "RESPONSABILIDAD",
            vec![Run::plain(
                "EL ARRENDADOR no será responsable de los daños que sufran los bienes de EL \
                 ARRENDATARIO por robo, caso fortuito o fuerza mayor.",
            )],
        ),
        (
            "SERVICIOS",
            vec![Run::plain(
                "Los pagos de luz, agua, gas, teléfono y demás servicios que contrate EL \
                 ARRENDATARIO correrán por su cuenta.",
            )],
        ),
        (
            "JURISDICCIÓN",
            vec![Run::plain(format!(
                "Para la interpretación y cumplimiento del presente contrato las partes se \
                 someten a las leyes y tribunales de {}, {}.",
                property.city, property.state
            ))],
        ),
    ]);

    for (ordinal, (title, body)) in ORDINALS.iter().zip(clauses) {
        let mut runs = vec![Run::bold(format!("{}. {}.", ordinal, title)), Run::plain(" ")];
        runs.extend(body);
        blocks.push(Block::Paragraph(runs));
    }

    let late_fee = version.rent * LATE_FEE_PERCENTAGE / 100.0;
    blocks.push(Block::Heading("AVISO DE PAGO".to_string()));
    blocks.push(Block::Paragraph(vec![
        Run::plain(
            "La renta deberá cubrirse dentro de los primeros cinco días naturales de cada mes. \
             Los pagos realizados después de esa fecha causarán un recargo del ",
        ),
        Run::keep(percentage(LATE_FEE_PERCENTAGE)),
        Run::plain(" sobre la renta mensual, equivalente a "),
        Run::keep(money(late_fee)),
        Run::plain("."),
    ]));

    blocks.push(Block::Paragraph(vec![
        Run::plain(format!(
            "Leído que fue el presente contrato y enteradas las partes de su contenido y alcance, \
             lo firman de conformidad en {}, {}, el ",
            property.city, property.state
        )),
        Run::keep(long_date(version.start_date)),
        Run::plain("."),
    ]));
    blocks.push(Block::Signatures(vec![
        ("EL ARRENDADOR".to_string(), landlord_name),
        ("EL ARRENDATARIO".to_string(), tenant_name),
    ]));

    Ok(blocks)
}

fn references_table(references: &[PartyView]) -> Block {
    let rows = if references.is_empty() {
        vec![vec!["Sin referencias registradas".to_string(), String::new(), String::new()]]
    } else {
        references
            .iter()
            .map(|party| {
                vec![
                    party.user.full_name(),
                    party.user.phone.clone(),
                    party
                        .address
                        .as_ref()
                        .map(|a| a.full_address())
                        .unwrap_or_else(|| "Sin domicilio registrado".to_string()),
                ]
            })
            .collect()
    };

    Block::Table {
        headers: vec!["Nombre".to_string(), "Teléfono".to_string(), "Domicilio".to_string()],
        widths: vec![0.3, 0.2, 0.5],
        rows,
    }
}
