// ============================================================================
// MODELS - MODULE PRINCIPAL
// ============================================================================
//
// Description:
//   Point d'entrée pour tous les modèles de données.
//   Chaque modèle correspond à une table avec SeaORM.
//
// Liste des modules:
//   - health : Health check API
//   - dto : Requêtes/réponses JSON de l'API
//   - users : Utilisateurs (admins et hosts, groupés par company_name)
//   - companies : Entreprises enregistrées (1 admin fondateur)
//   - visitors : Identité déclarée d'un visiteur pour une visite
//   - visits : Visites (check-in / checkout)
//   - email_verification_tokens : Tokens de vérification email (expire 24h)
//
// Points d'attention:
//   - Les tables sont créées par crate::migration au démarrage
//   - Les relations entre tables sont définies dans chaque modèle
//
// ============================================================================

pub mod health;
pub mod dto;
pub mod users;
pub mod companies;
pub mod visitors;
pub mod visits;
pub mod email_verification_tokens;
