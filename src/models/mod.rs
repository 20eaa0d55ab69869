// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Entités SeaORM et vues JSON de l'API catalogue.
//
// Liste des modules:
//   - client : Clients (sociétés) auxquels les utilisateurs sont rattachés
//   - users : Utilisateurs (email unique, mot de passe hashé, rôles)
//   - product : Produits du catalogue
//   - dto : Vues JSON (groupes de sérialisation + liens HATEOAS) et payloads
//
// Points d'attention:
//   - Les timestamps sont posés explicitement (ActiveModel::new / touch)
//   - Un utilisateur appartient toujours à un client (client_id non nul)
//
// ============================================================================

pub mod client;
pub mod users;
pub mod product;
pub mod dto;
